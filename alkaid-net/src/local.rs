//! In-process MPC network over channels. Used for tests and benchmarks.

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender};
use eyre::eyre;

use crate::{ConnectionStats, Network, DEFAULT_CONNECTION_TIMEOUT};

/// One duplex peer connection with traffic counters.
#[derive(Debug)]
struct Link {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    sent: AtomicUsize,
    recvd: AtomicUsize,
}

impl Link {
    fn new(tx: Sender<Vec<u8>>, rx: Receiver<Vec<u8>>) -> Self {
        Self {
            tx,
            rx,
            sent: AtomicUsize::new(0),
            recvd: AtomicUsize::new(0),
        }
    }
}

/// A network connecting the parties of one process through channels. The
/// link slot at a party's own index stays empty.
#[derive(Debug)]
pub struct LocalNetwork {
    id: usize,
    timeout: Duration,
    links: Vec<Option<Link>>,
}

impl LocalNetwork {
    /// Creates the fully connected networks of `num_parties` parties.
    pub fn new(num_parties: usize) -> Vec<Self> {
        let mut nets = (0..num_parties)
            .map(|id| LocalNetwork {
                id,
                timeout: DEFAULT_CONNECTION_TIMEOUT,
                links: (0..num_parties).map(|_| None).collect(),
            })
            .collect::<Vec<_>>();

        // one duplex link per unordered party pair
        for low in 0..num_parties {
            for high in low + 1..num_parties {
                let (to_high, from_low) = crossbeam_channel::unbounded();
                let (to_low, from_high) = crossbeam_channel::unbounded();
                nets[low].links[high] = Some(Link::new(to_high, from_high));
                nets[high].links[low] = Some(Link::new(to_low, from_low));
            }
        }
        nets
    }

    /// Creates the three connected party networks.
    pub fn new_3_parties() -> [Self; 3] {
        Self::new(3).try_into().expect("three parties requested")
    }

    fn link(&self, peer: usize) -> eyre::Result<&Link> {
        self.links
            .get(peer)
            .and_then(Option::as_ref)
            .ok_or_else(|| eyre!("no connection to party {peer}"))
    }
}

impl Network for LocalNetwork {
    fn id(&self) -> usize {
        self.id
    }

    fn send(&self, to: usize, data: &[u8]) -> eyre::Result<()> {
        let link = self.link(to)?;
        link.sent.fetch_add(data.len(), Ordering::Relaxed);
        link.tx
            .send(data.to_vec())
            .map_err(|_| eyre!("party {to} hung up"))
    }

    fn recv(&self, from: usize) -> eyre::Result<Vec<u8>> {
        let link = self.link(from)?;
        let data = link.rx.recv_timeout(self.timeout)?;
        link.recvd.fetch_add(data.len(), Ordering::Relaxed);
        Ok(data)
    }

    fn get_connection_stats(&self) -> ConnectionStats {
        let stats = self
            .links
            .iter()
            .enumerate()
            .filter_map(|(peer, link)| {
                let link = link.as_ref()?;
                Some((
                    peer,
                    (
                        link.sent.load(Ordering::Relaxed),
                        link.recvd.load(Ordering::Relaxed),
                    ),
                ))
            })
            .collect();
        ConnectionStats {
            my_id: self.id,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_rotation() {
        let mut handles = Vec::new();
        for net in LocalNetwork::new(3) {
            handles.push(std::thread::spawn(move || {
                let me = net.id();
                net.send((me + 1) % 3, &[me as u8]).unwrap();
                let got = net.recv((me + 2) % 3).unwrap();
                assert_eq!(got, vec![((me + 2) % 3) as u8]);
                net.get_connection_stats()
            }));
        }
        for handle in handles {
            let stats = handle.join().unwrap();
            let sent: usize = stats.stats.values().map(|(sent, _)| sent).sum();
            let recvd: usize = stats.stats.values().map(|(_, recvd)| recvd).sum();
            assert_eq!(sent, 1);
            assert_eq!(recvd, 1);
        }
    }

    #[test]
    fn unknown_peer_is_an_error() {
        let net = LocalNetwork::new(2).pop().unwrap();
        assert!(net.send(5, b"x").is_err());
        assert!(net.send(net.id(), b"x").is_err());
    }
}
