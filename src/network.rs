use std::io;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use tracing::debug;

/// The address of the interface used for outbound traffic, which is what devices on the network should connect to.
/// Connecting a UDP socket only selects a route, nothing is sent.
pub fn local_ip() -> IpAddr {
    outbound_ip().unwrap_or_else(|e| {
        debug!("Could not determine local IP address, using loopback: {}", e);
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    })
}

fn outbound_ip() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80))?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ip_is_a_concrete_ipv4_address() {
        let ip = local_ip();

        assert!(ip.is_ipv4());
        assert!(!ip.is_unspecified());
    }
}
