use super::POLL_INTERVAL;
use crate::di::Services;
use anyhow::{anyhow, Context};
use clap::Args;
use ferrous_socks_application::ports::ResolverFactory;
use ferrous_socks_domain::{reverse_name, DnsResponse, RecordType, Section};
use std::net::IpAddr;
use std::thread;

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Name to query, or an IP address with --reverse
    pub name: String,

    /// Record type (A, NS, CNAME, SOA, PTR, MX, TXT, DS, RRSIG, DNSKEY)
    #[arg(short = 't', long = "type", default_value = "A")]
    pub record_type: String,

    /// PTR lookup of an IP address
    #[arg(short = 'x', long)]
    pub reverse: bool,
}

fn question(args: &LookupArgs) -> anyhow::Result<(String, RecordType)> {
    if args.reverse {
        let ip: IpAddr = args
            .name
            .parse()
            .with_context(|| format!("'{}' is not an IP address", args.name))?;
        return Ok((reverse_name(&ip), RecordType::PTR));
    }
    let record_type = args
        .record_type
        .parse::<RecordType>()
        .map_err(|e| anyhow!(e))?;
    Ok((args.name.clone(), record_type))
}

pub fn run(services: &Services, args: LookupArgs) -> anyhow::Result<()> {
    let (name, record_type) = question(&args)?;

    let mut resolver = services.resolvers.create(&services.dns_server)?;
    resolver.query(&name, record_type)?;

    let response = loop {
        if let Some(outcome) = resolver.poll() {
            break outcome?;
        }
        thread::sleep(POLL_INTERVAL);
    };

    print_response(&services.dns_server.to_string(), &response);
    Ok(())
}

fn print_response(server: &str, response: &DnsResponse) {
    println!(
        ";; server {} id {} status {}{}{}",
        server,
        response.id,
        response.flags.rcode_name(),
        if response.flags.authoritative { " aa" } else { "" },
        if response.flags.authenticated { " ad" } else { "" },
    );

    println!(";; QUESTION");
    for query in &response.queries {
        println!("{}\t{}", query.name, query.type_mnemonic());
    }

    let sections = [
        ("ANSWER", Section::Answer),
        ("AUTHORITY", Section::Nameserver),
        ("ADDITIONAL", Section::Additional),
    ];
    for (title, section) in sections {
        let records = response.records(section);
        if records.is_empty() {
            continue;
        }
        println!(";; {}", title);
        for record in records {
            println!("{}", record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(name: &str, record_type: &str, reverse: bool) -> LookupArgs {
        LookupArgs {
            name: name.to_string(),
            record_type: record_type.to_string(),
            reverse,
        }
    }

    #[test]
    fn test_reverse_question() {
        let (name, rtype) = question(&args("93.184.216.34", "A", true)).unwrap();
        assert_eq!(name, "34.216.184.93.in-addr.arpa");
        assert_eq!(rtype, RecordType::PTR);
    }

    #[test]
    fn test_reverse_needs_ip() {
        assert!(question(&args("example.com", "A", true)).is_err());
    }

    #[test]
    fn test_type_is_case_insensitive() {
        let (_, rtype) = question(&args("example.com", "mx", false)).unwrap();
        assert_eq!(rtype, RecordType::MX);
        assert!(question(&args("example.com", "AAAA", false)).is_err());
    }
}
