use std::net::Ipv4Addr;

use anyhow::{Context, ensure};
use pnet::packet::dns::{
    DnsClass, DnsPacket, DnsQuery, DnsResponse, DnsType, DnsTypes, MutableDnsPacket, Opcode,
    Retcode,
};

pub const DNS_HDR_LEN: usize = 12;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
const CLASS_IN: DnsClass = DnsClass(1);
const NAME_POINTER_TAG: u16 = 0xc000;

/// Builds a recursive A-record query for `domain`.
pub fn create_a_packet(domain: &str, id: u16) -> anyhow::Result<Vec<u8>> {
    let query: DnsQuery = create_query(domain, DnsTypes::A)?;
    create_query_packet(&query, id)
}

/// Extracts the IPv4 answers of a response to the query identified by `expected_id`.
///
/// CNAME and other record types in the answer section are skipped. A valid
/// response without A records yields an empty list.
///
/// pnet reads every answer owner name as a two byte compression pointer, so a
/// response carrying an uncompressed owner name is rejected rather than misread.
pub fn get_a_records(payload: &[u8], expected_id: u16) -> anyhow::Result<Vec<Ipv4Addr>> {
    let dns: DnsPacket = DnsPacket::new(payload).context("Failed to parse DNS packet")?;
    ensure!(dns.get_is_response() == 1, "packet is not a DNS response");
    ensure!(
        dns.get_id() == expected_id,
        "unexpected transaction id {} (expected {expected_id})",
        dns.get_id()
    );

    let responses: Vec<DnsResponse> = dns.get_responses();
    ensure!(
        responses
            .iter()
            .all(|response| response.name_tag & NAME_POINTER_TAG == NAME_POINTER_TAG),
        "answer owner name is not a compression pointer"
    );

    let records: Vec<Ipv4Addr> = responses
        .iter()
        .filter_map(|response| match response.rtype {
            DnsTypes::A => address_from_a(response),
            _ => None,
        })
        .collect();

    Ok(records)
}

fn create_query_packet(query: &DnsQuery, id: u16) -> anyhow::Result<Vec<u8>> {
    let q_fixed_len: usize = 4;
    let qlen: usize = query.qname.len() + q_fixed_len;
    let total: usize = DNS_HDR_LEN + qlen;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket =
            MutableDnsPacket::new(&mut buffer).context("creating dns header")?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_authoriative(0);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(1);
        dns.set_is_recursion_available(0);
        dns.set_zero_reserved(0);
        dns.set_is_non_authenticated_data(0);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    // The question section is written by hand, pnet only lays out the header.
    let mut cursor: usize = DNS_HDR_LEN;

    buffer[cursor..cursor + query.qname.len()].copy_from_slice(&query.qname);
    cursor += query.qname.len();

    let type_bytes: [u8; 2] = query.qtype.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&type_bytes);
    cursor += 2;

    let class_bytes: [u8; 2] = query.qclass.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&class_bytes);

    Ok(buffer)
}

fn address_from_a(response: &DnsResponse) -> Option<Ipv4Addr> {
    let octets: [u8; 4] = response.data.as_slice().try_into().ok()?;
    Some(Ipv4Addr::from(octets))
}

fn create_query(domain: &str, qtype: DnsType) -> anyhow::Result<DnsQuery> {
    let qname: Vec<u8> = encode_dns_name(domain)?;
    let query: DnsQuery = DnsQuery {
        qname,
        qtype,
        qclass: CLASS_IN,
        payload: Vec::new(),
    };
    Ok(query)
}

fn encode_dns_name(name: &str) -> anyhow::Result<Vec<u8>> {
    let mut encoded: Vec<u8> = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        ensure!(label.len() <= MAX_LABEL_LEN, "label '{label}' is too long");
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    ensure!(!encoded.is_empty(), "empty domain name");
    encoded.push(0);
    ensure!(encoded.len() <= MAX_NAME_LEN, "domain name '{name}' is too long");
    Ok(encoded)
}
