//! ICMPv4 echo codec for datagram (unprivileged) ICMP sockets.
//!
//! On such sockets the kernel strips the IP header on Linux but keeps it on
//! macOS/BSD, so [`parse_echo_reply`] accepts both layouts.

use anyhow::Context;
use pnet::packet::Packet;
use pnet::packet::icmp::echo_reply::EchoReplyPacket;
use pnet::packet::icmp::echo_request::MutableEchoRequestPacket;
use pnet::packet::icmp::{self, IcmpCode, IcmpPacket, IcmpTypes};

pub const ICMP_ECHO_HDR_LEN: usize = 8;
const IPV4_MIN_HDR_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoReply {
    pub sequence: u16,
    pub payload: Vec<u8>,
}

pub fn create_echo_request(identifier: u16, sequence: u16, payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0u8; ICMP_ECHO_HDR_LEN + payload.len()];
    {
        let mut echo: MutableEchoRequestPacket =
            MutableEchoRequestPacket::new(&mut buffer).context("creating echo request packet")?;
        echo.set_icmp_type(IcmpTypes::EchoRequest);
        echo.set_icmp_code(IcmpCode(0));
        echo.set_identifier(identifier);
        echo.set_sequence_number(sequence);
        echo.set_payload(payload);
        echo.set_checksum(0);
    }

    let csm: u16 = {
        let icmp_pkt: IcmpPacket = IcmpPacket::new(&buffer).context("creating ICMP packet")?;
        icmp::checksum(&icmp_pkt)
    };
    let mut echo: MutableEchoRequestPacket =
        MutableEchoRequestPacket::new(&mut buffer).context("creating echo request packet")?;
    echo.set_checksum(csm);

    Ok(buffer)
}

/// Returns `None` for anything that is not an echo reply.
pub fn parse_echo_reply(bytes: &[u8]) -> Option<EchoReply> {
    let icmp_bytes: &[u8] = strip_ipv4_header(bytes);
    let reply: EchoReplyPacket = EchoReplyPacket::new(icmp_bytes)?;
    if reply.get_icmp_type() != IcmpTypes::EchoReply {
        return None;
    }
    Some(EchoReply {
        sequence: reply.get_sequence_number(),
        payload: reply.payload().to_vec(),
    })
}

fn strip_ipv4_header(bytes: &[u8]) -> &[u8] {
    match bytes.first() {
        Some(first) if first >> 4 == 4 && bytes.len() >= IPV4_MIN_HDR_LEN => {
            let header_len: usize = usize::from(first & 0x0f) * 4;
            bytes.get(header_len..).unwrap_or_default()
        }
        _ => bytes,
    }
}
