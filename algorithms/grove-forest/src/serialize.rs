//! Binary tree format
//!
//! Trees are written in preorder, all numbers little-endian. Every node record starts with a
//! `u32` tag followed by its payload:
//!
//! | tag | node    | payload                                                                 |
//! |-----|---------|-------------------------------------------------------------------------|
//! | 0   | invalid | none, a tree consisting of only this tag is empty                       |
//! | 1   | split   | `u64` action length, action, `u64` column, `f64` threshold, `u64` child count, children |
//! | 2   | leaf    | `u64` action length, action, `u8` classification                        |
//!
//! Actions are UTF-8 without terminator. There is no checksum, corrupt values which are still
//! well-formed read back without error.
use std::io::{Read, Write};

use crate::error::{ForestError, Result};
use crate::{Node, RandomTree};

const TAG_INVALID: u32 = 0;
const TAG_SPLIT: u32 = 1;
const TAG_LEAF: u32 = 2;

impl RandomTree {
    /// Write the tree to a byte stream
    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        match self.root() {
            Some(root) => write_node(writer, root),
            None => write_u32(writer, TAG_INVALID),
        }
    }

    /// Read a tree written by [`RandomTree::serialize`]
    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self> {
        match read_tag(reader)? {
            TAG_INVALID => Ok(RandomTree::new()),
            tag => read_node(reader, tag).map(RandomTree::from_root),
        }
    }
}

/// Write a node and its subtree
pub fn write_node<W: Write>(writer: &mut W, node: &Node) -> Result<()> {
    match node {
        Node::Leaf {
            action,
            classification,
        } => {
            write_u32(writer, TAG_LEAF)?;
            write_action(writer, action)?;
            writer.write_all(&[*classification as u8])?;
        }
        Node::Split {
            action,
            column,
            threshold,
            ..
        } => {
            write_u32(writer, TAG_SPLIT)?;
            write_action(writer, action)?;
            write_u64(writer, *column as u64)?;
            writer.write_all(&threshold.to_le_bytes())?;

            let children = node.children();
            write_u64(writer, children.len() as u64)?;
            for child in children {
                write_node(writer, child)?;
            }
        }
    }
    Ok(())
}

fn read_node<R: Read>(reader: &mut R, tag: u32) -> Result<Node> {
    match tag {
        TAG_LEAF => {
            let action = read_action(reader)?;
            let mut classification = [0u8; 1];
            reader.read_exact(&mut classification)?;
            Ok(Node::leaf(action, classification[0] != 0))
        }
        TAG_SPLIT => {
            let action = read_action(reader)?;
            let column = read_u64(reader)? as usize;
            let threshold = f64::from_le_bytes(read_array(reader)?);

            match read_u64(reader)? {
                0 => Ok(Node::unlinked(action, column, threshold)),
                2 => {
                    let le = read_child(reader)?;
                    let g = read_child(reader)?;
                    Ok(Node::branch(action, column, threshold, le, g))
                }
                children => Err(ForestError::MalformedNode { children }),
            }
        }
        tag => Err(ForestError::InvalidNodeTag(tag)),
    }
}

/// Children are never invalid nodes
fn read_child<R: Read>(reader: &mut R) -> Result<Node> {
    let tag = read_tag(reader)?;
    read_node(reader, tag)
}

fn read_tag<R: Read>(reader: &mut R) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array(reader)?))
}

fn write_action<W: Write>(writer: &mut W, action: &str) -> Result<()> {
    write_u64(writer, action.len() as u64)?;
    writer.write_all(action.as_bytes())?;
    Ok(())
}

fn read_action<R: Read>(reader: &mut R) -> Result<String> {
    let len = read_u64(reader)?;
    let mut bytes = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut bytes)?;
    if (bytes.len() as u64) < len {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    Ok(String::from_utf8(bytes)?)
}

pub(crate) fn write_u32<W: Write>(writer: &mut W, value: u32) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

pub(crate) fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    Ok(u64::from_le_bytes(read_array(reader)?))
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
