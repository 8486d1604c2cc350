use std::net::Ipv4Addr;

use anyhow::{Context, ensure};
use dns_parser::{Packet, RData, ResponseCode};
use pnet::packet::dns::{DnsTypes, MutableDnsPacket, Opcode, Retcode};

pub const DNS_HDR_LEN: usize = 12;
pub const DNS_PORT: u16 = 53;

const CLASS_IN: u16 = 1;

/// Decoded reply to a PTR query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtrAnswer {
    pub id: u16,
    /// Every PTR target in answer order. Empty for NXDOMAIN or an empty answer section.
    pub names: Vec<String>,
}

/// `4.3.2.1.in-addr.arpa` for `1.2.3.4`.
pub fn reverse_ptr_name(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{d}.{c}.{b}.{a}.in-addr.arpa")
}

pub fn create_ptr_packet(addr: Ipv4Addr, id: u16) -> anyhow::Result<Vec<u8>> {
    let qname: Vec<u8> = encode_dns_name(&reverse_ptr_name(addr))?;
    let total: usize = DNS_HDR_LEN + qname.len() + 4;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket =
            MutableDnsPacket::new(&mut buffer).context("creating dns header")?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(1);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    let mut cursor: usize = DNS_HDR_LEN;
    buffer[cursor..cursor + qname.len()].copy_from_slice(&qname);
    cursor += qname.len();
    buffer[cursor..cursor + 2].copy_from_slice(&DnsTypes::PTR.0.to_be_bytes());
    cursor += 2;
    buffer[cursor..cursor + 2].copy_from_slice(&CLASS_IN.to_be_bytes());

    Ok(buffer)
}

/// Parses a reply datagram. Callers match `PtrAnswer::id` against the query they sent.
pub fn parse_ptr_response(payload: &[u8]) -> anyhow::Result<PtrAnswer> {
    let packet = Packet::parse(payload).context("failed to parse DNS packet")?;
    ensure!(!packet.header.query, "DNS packet is a query, not a response");

    let names: Vec<String> = match packet.header.response_code {
        ResponseCode::NoError => packet
            .answers
            .iter()
            .filter_map(|record| match &record.data {
                RData::PTR(ptr) => Some(ptr.0.to_string()),
                _ => None,
            })
            .collect(),
        ResponseCode::NameError => Vec::new(),
        code => anyhow::bail!("nameserver answered with {code:?}"),
    };

    Ok(PtrAnswer {
        id: packet.header.id,
        names,
    })
}

fn encode_dns_name(name: &str) -> anyhow::Result<Vec<u8>> {
    let mut encoded: Vec<u8> = Vec::with_capacity(name.len() + 2);
    for label in name.split('.').filter(|label| !label.is_empty()) {
        ensure!(label.len() <= 63, "DNS label `{label}` is too long");
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a reply to the query produced by `create_ptr_packet`, with the
    /// answer owner names compressed back to the question.
    fn ptr_reply(query: &[u8], rcode: u8, targets: &[&str]) -> Vec<u8> {
        let mut reply = query.to_vec();
        reply[2] = 0x81;
        reply[3] = 0x80 | rcode;
        reply[6..8].copy_from_slice(&(targets.len() as u16).to_be_bytes());
        for target in targets {
            let rdata = encode_dns_name(target).unwrap();
            reply.extend_from_slice(&[0xC0, 0x0C]);
            reply.extend_from_slice(&DnsTypes::PTR.0.to_be_bytes());
            reply.extend_from_slice(&CLASS_IN.to_be_bytes());
            reply.extend_from_slice(&300u32.to_be_bytes());
            reply.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            reply.extend_from_slice(&rdata);
        }
        reply
    }

    #[test]
    fn test_reverse_ptr_name() {
        assert_eq!(
            reverse_ptr_name(Ipv4Addr::new(192, 168, 1, 10)),
            "10.1.168.192.in-addr.arpa"
        );
    }

    #[test]
    fn test_create_ptr_packet_layout() {
        let packet = create_ptr_packet(Ipv4Addr::new(1, 2, 3, 4), 0xBEEF).unwrap();

        assert_eq!(&packet[0..2], &[0xBE, 0xEF]);
        // Standard query, recursion desired, one question.
        assert_eq!(packet[2], 0x01);
        assert_eq!(&packet[4..6], &[0, 1]);

        let parsed = Packet::parse(&packet).unwrap();
        assert!(parsed.header.query);
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].qname.to_string(), "4.3.2.1.in-addr.arpa");
        assert_eq!(packet.len(), DNS_HDR_LEN + 22 + 4);
    }

    #[test]
    fn test_parse_ptr_response_collects_all_names() {
        let query = create_ptr_packet(Ipv4Addr::new(192, 168, 1, 1), 7).unwrap();
        let reply = ptr_reply(&query, 0, &["router.local", "gateway.local"]);

        let answer = parse_ptr_response(&reply).unwrap();
        assert_eq!(answer.id, 7);
        assert_eq!(answer.names, vec!["router.local", "gateway.local"]);
    }

    #[test]
    fn test_parse_ptr_response_nxdomain_is_empty() {
        let query = create_ptr_packet(Ipv4Addr::new(10, 0, 0, 3), 99).unwrap();
        let reply = ptr_reply(&query, 3, &[]);

        let answer = parse_ptr_response(&reply).unwrap();
        assert_eq!(answer.id, 99);
        assert!(answer.names.is_empty());
    }

    #[test]
    fn test_parse_ptr_response_rejects_queries_and_failures() {
        let query = create_ptr_packet(Ipv4Addr::new(10, 0, 0, 3), 1).unwrap();
        assert!(parse_ptr_response(&query).is_err());

        let servfail = ptr_reply(&query, 2, &[]);
        assert!(parse_ptr_response(&servfail).is_err());

        assert!(parse_ptr_response(&[0u8; 5]).is_err());
    }

    #[test]
    fn test_encode_dns_name_rejects_long_labels() {
        assert!(encode_dns_name(&"a".repeat(64)).is_err());
        assert_eq!(encode_dns_name("ab.c").unwrap(), vec![2, b'a', b'b', 1, b'c', 0]);
    }
}
