//! TCP MPC network.

use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
    sync::atomic::AtomicUsize,
    time::Duration,
};

use byteorder::{BigEndian, ReadBytesExt as _, WriteBytesExt as _};
use crossbeam_channel::Receiver;
use eyre::{Context as _, ContextCompat as _};
use intmap::IntMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use socket2::{Domain, Socket, TcpKeepalive, Type};

use crate::{ConnectionStats, Network, DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_FRAME_LENGTH};

/// A party in the network.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct NetworkParty {
    /// The id of the party, 0-based indexing.
    pub id: usize,
    /// The host:port the party listens on.
    pub address: String,
}

impl NetworkParty {
    /// Construct a new [`NetworkParty`] type.
    pub fn new(id: usize, address: String) -> Self {
        Self { id, address }
    }
}

/// The network configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct NetworkConfig {
    /// The list of parties in the network.
    pub parties: Vec<NetworkParty>,
    /// Our own id in the network.
    pub my_id: usize,
    /// The [`SocketAddr`] we bind to.
    pub bind_addr: SocketAddr,
    /// The connection timeout.
    #[serde(default)]
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
    /// The max length (in bytes) of a single frame.
    #[serde(default)]
    pub max_frame_length: Option<usize>,
}

/// A MPC network over [`TcpStream`]s. Each peer connection is split into a
/// locked writer and a reader thread that forwards whole frames through a
/// channel, so sends and receives never block each other.
#[derive(Debug)]
pub struct TcpNetwork {
    id: usize,
    timeout: Duration,
    send: IntMap<usize, (Mutex<TcpStream>, AtomicUsize)>,
    recv: IntMap<usize, (Receiver<eyre::Result<Vec<u8>>>, AtomicUsize)>,
}

impl TcpNetwork {
    /// Establishes connections to all peers as described by `config`.
    /// Parties with a lower id accept the connection, parties with a higher
    /// id connect.
    pub fn new(config: NetworkConfig) -> eyre::Result<Self> {
        let my_id = config.my_id;
        let timeout = config.timeout.unwrap_or(DEFAULT_CONNECTION_TIMEOUT);
        let max_frame_length = config.max_frame_length.unwrap_or(DEFAULT_MAX_FRAME_LENGTH);

        let domain = match config.bind_addr {
            SocketAddr::V4(_) => Domain::IPV4,
            SocketAddr::V6(_) => Domain::IPV6,
        };
        let socket = Socket::new(domain, Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        // a read timeout on the listener bounds accept() if a party never shows up
        socket.set_read_timeout(Some(timeout))?;
        let keepalive = TcpKeepalive::new().with_interval(Duration::from_secs(1));
        socket.set_tcp_keepalive(&keepalive)?;
        socket.bind(&config.bind_addr.into())?;
        socket.listen(16)?;
        let listener = TcpListener::from(socket);

        // lower ids are servers, higher ids call them
        let mut streams: Vec<(usize, TcpStream)> = Vec::with_capacity(config.parties.len());
        for party in config.parties.iter().filter(|p| p.id < my_id) {
            let addr = party
                .address
                .to_socket_addrs()
                .with_context(|| format!("resolving address of party {}", party.id))?
                .next()
                .with_context(|| format!("no address for party {}", party.id))?;
            let mut stream = Self::connect_with_retry(addr, timeout)?;
            stream.write_all(&(my_id as u32).to_be_bytes())?;
            streams.push((party.id, stream));
        }
        let expected_accepts = config.parties.iter().filter(|p| p.id > my_id).count();
        for _ in 0..expected_accepts {
            let (mut stream, _) = listener.accept().context("accepting peer connection")?;
            let mut id_bytes = [0u8; 4];
            stream.read_exact(&mut id_bytes)?;
            let peer_id = u32::from_be_bytes(id_bytes) as usize;
            if peer_id >= config.parties.len() || streams.iter().any(|(id, _)| *id == peer_id) {
                eyre::bail!("unexpected peer id {peer_id} during connection setup");
            }
            streams.push((peer_id, stream));
        }

        let mut send = IntMap::new();
        let mut recv = IntMap::new();
        for (peer_id, stream) in streams {
            stream.set_nodelay(true)?;
            let reader = stream.try_clone()?;
            let (tx, rx) = crossbeam_channel::bounded(32);
            std::thread::Builder::new()
                .name(format!("net-recv-{my_id}-{peer_id}"))
                .spawn(move || Self::recv_loop(reader, tx, max_frame_length))?;
            send.insert(peer_id, (Mutex::new(stream), AtomicUsize::default()));
            recv.insert(peer_id, (rx, AtomicUsize::default()));
        }

        Ok(Self {
            id: my_id,
            timeout,
            send,
            recv,
        })
    }

    fn connect_with_retry(addr: SocketAddr, timeout: Duration) -> eyre::Result<TcpStream> {
        let start = std::time::Instant::now();
        loop {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(err) if start.elapsed() < timeout => {
                    tracing::trace!("connect to {addr} failed ({err}), retrying");
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("connecting to {addr}"));
                }
            }
        }
    }

    fn recv_loop(
        mut reader: TcpStream,
        tx: crossbeam_channel::Sender<eyre::Result<Vec<u8>>>,
        max_frame_length: usize,
    ) {
        loop {
            let frame = Self::read_frame(&mut reader, max_frame_length);
            let failed = frame.is_err();
            if tx.send(frame).is_err() || failed {
                break;
            }
        }
    }

    fn read_frame(reader: &mut TcpStream, max_frame_length: usize) -> eyre::Result<Vec<u8>> {
        let len = reader.read_u32::<BigEndian>()? as usize;
        if len > max_frame_length {
            eyre::bail!("frame of {len} bytes exceeds the frame length limit");
        }
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;
        Ok(data)
    }
}

impl Network for TcpNetwork {
    fn id(&self) -> usize {
        self.id
    }

    fn send(&self, to: usize, data: &[u8]) -> eyre::Result<()> {
        let (stream, sent_bytes) = self.send.get(to).context("party id out-of-bounds")?;
        sent_bytes.fetch_add(data.len(), std::sync::atomic::Ordering::Relaxed);
        let mut stream = stream.lock();
        stream.write_u32::<BigEndian>(u32::try_from(data.len())?)?;
        stream.write_all(data)?;
        Ok(())
    }

    fn recv(&self, from: usize) -> eyre::Result<Vec<u8>> {
        let (receiver, recv_bytes) = self.recv.get(from).context("party id out-of-bounds")?;
        let data = receiver.recv_timeout(self.timeout)??;
        recv_bytes.fetch_add(data.len(), std::sync::atomic::Ordering::Relaxed);
        Ok(data)
    }

    fn get_connection_stats(&self) -> ConnectionStats {
        let mut stats = std::collections::BTreeMap::new();
        for (id, (_, sent_bytes)) in self.send.iter() {
            let recv_bytes = &self.recv.get(id).expect("was in send so must be in recv").1;
            stats.insert(
                id,
                (
                    sent_bytes.load(std::sync::atomic::Ordering::Relaxed),
                    recv_bytes.load(std::sync::atomic::Ordering::Relaxed),
                ),
            );
        }
        ConnectionStats {
            my_id: self.id,
            stats,
        }
    }
}
