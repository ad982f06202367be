use super::error::CollectorError;
use dnstap_collector_domain::ListenEndpoint;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::debug;

#[cfg(unix)]
use std::path::PathBuf;
#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};

const TCP_BACKLOG: i32 = 1024;

/// Bound listening socket for dnstap senders.
pub enum DnstapListener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix {
        listener: UnixListener,
        path: PathBuf,
    },
}

pub enum Connection {
    Tcp(TcpStream, SocketAddr),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    pub fn peer(&self) -> String {
        match self {
            Connection::Tcp(_, addr) => addr.to_string(),
            #[cfg(unix)]
            Connection::Unix(_) => "unix".to_string(),
        }
    }
}

impl DnstapListener {
    /// Must be called from within a Tokio runtime.
    pub fn bind(endpoint: &ListenEndpoint) -> Result<Self, CollectorError> {
        let bind_error = |source| CollectorError::Bind {
            endpoint: endpoint.to_string(),
            source,
        };

        match endpoint {
            ListenEndpoint::Tcp(addr) => create_tcp_listener(*addr)
                .map(DnstapListener::Tcp)
                .map_err(bind_error),
            #[cfg(unix)]
            ListenEndpoint::Unix(path) => {
                remove_stale_socket(path).map_err(bind_error)?;
                let listener = UnixListener::bind(path).map_err(bind_error)?;
                Ok(DnstapListener::Unix {
                    listener,
                    path: path.clone(),
                })
            }
            #[cfg(not(unix))]
            ListenEndpoint::Unix(_) => Err(CollectorError::UnsupportedTransport),
        }
    }

    /// The actual bound endpoint; resolves port 0 to the assigned port.
    pub fn local_endpoint(&self) -> io::Result<ListenEndpoint> {
        match self {
            DnstapListener::Tcp(listener) => listener.local_addr().map(ListenEndpoint::Tcp),
            #[cfg(unix)]
            DnstapListener::Unix { path, .. } => Ok(ListenEndpoint::Unix(path.clone())),
        }
    }

    pub async fn accept(&self) -> io::Result<Connection> {
        match self {
            DnstapListener::Tcp(listener) => {
                let (stream, addr) = listener.accept().await?;
                stream.set_nodelay(true)?;
                Ok(Connection::Tcp(stream, addr))
            }
            #[cfg(unix)]
            DnstapListener::Unix { listener, .. } => {
                let (stream, _) = listener.accept().await?;
                Ok(Connection::Unix(stream))
            }
        }
    }

    /// Closes the socket and removes a Unix socket file.
    pub fn close(self) {
        match self {
            DnstapListener::Tcp(_) => {}
            #[cfg(unix)]
            DnstapListener::Unix { listener, path } => {
                drop(listener);
                if let Err(e) = std::fs::remove_file(&path) {
                    debug!(path = %path.display(), error = %e, "Socket file not removed");
                }
            }
        }
    }
}

fn create_tcp_listener(socket_addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if socket_addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(TCP_BACKLOG)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

/// A socket file left behind by a previous run blocks `bind`. Anything that
/// is not a socket is left alone.
#[cfg(unix)]
fn remove_stale_socket(path: &std::path::Path) -> io::Result<()> {
    use std::os::unix::fs::FileTypeExt;

    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_socket() => {
            debug!(path = %path.display(), "Removing stale socket file");
            std::fs::remove_file(path)
        }
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "path exists and is not a socket",
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
