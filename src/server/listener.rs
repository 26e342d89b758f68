// Listener module
// Binds the single TCP listening socket the server accepts from

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Bind a `TcpListener` with `SO_REUSEADDR` and `SO_REUSEPORT` enabled.
///
/// `SO_REUSEADDR` allows rebinding a port still in `TIME_WAIT`;
/// `SO_REUSEPORT` lets a replacement process bind before the old one exits.
/// Binding failure is unrecoverable for the process and is surfaced to the
/// caller.
pub fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
