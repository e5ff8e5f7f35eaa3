use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{Message, MessageChannel};
use crate::error::{ForestError, Result};

/// In-process cluster of ranks connected by channels
///
/// Every endpoint can send to every rank, including itself. Rank 0 acts as coordinator.
#[derive(Debug)]
pub struct LocalCluster {
    endpoints: Vec<LocalEndpoint>,
}

/// One rank of a [`LocalCluster`]
#[derive(Debug)]
pub struct LocalEndpoint {
    rank: usize,
    senders: Vec<Sender<Message>>,
    receiver: Receiver<Message>,
}

impl LocalCluster {
    pub fn new(size: usize) -> Self {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();

        let endpoints = receivers
            .into_iter()
            .enumerate()
            .map(|(rank, receiver)| LocalEndpoint {
                rank,
                senders: senders.clone(),
                receiver,
            })
            .collect();

        LocalCluster { endpoints }
    }

    pub fn size(&self) -> usize {
        self.endpoints.len()
    }

    /// Endpoints ordered by rank
    pub fn into_endpoints(self) -> Vec<LocalEndpoint> {
        self.endpoints
    }
}

impl MessageChannel for LocalEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn send(&self, to: usize, message: Message) -> Result<()> {
        let sender = self.senders.get(to).ok_or_else(|| {
            ForestError::Channel(format!("rank {} is not part of the cluster", to))
        })?;
        sender
            .send(message)
            .map_err(|_| ForestError::Channel(format!("rank {} hung up", to)))
    }

    fn recv(&self) -> Result<Message> {
        self.receiver
            .recv()
            .map_err(|_| ForestError::Channel(format!("rank {} lost all senders", self.rank)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributed::MessageKind;

    #[test]
    fn endpoints_reach_every_rank() {
        let endpoints = LocalCluster::new(3).into_endpoints();
        assert_eq!(endpoints.len(), 3);

        endpoints[2].send(0, Message::row(vec![1., 2.])).unwrap();
        endpoints[0].send(0, Message::done()).unwrap();

        let first = endpoints[0].recv().unwrap();
        assert_eq!(first.kind, MessageKind::Row);
        assert_eq!(first.payload, vec![1., 2.]);
        assert_eq!(endpoints[0].recv().unwrap().kind, MessageKind::Done);

        assert_eq!(endpoints[1].rank(), 1);
        assert_eq!(endpoints[1].size(), 3);
        assert!(endpoints[1].send(3, Message::done()).is_err());
    }
}
