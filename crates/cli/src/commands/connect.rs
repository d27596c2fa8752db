use super::POLL_INTERVAL;
use crate::di::Services;
use anyhow::{anyhow, Context};
use clap::Args;
use ferrous_socks_domain::{Config, Proxy};
use ferrous_socks_infrastructure::socks::Socks5Socket;
use std::io::{self, Read, Write};
use std::thread;
use std::time::Instant;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// SOCKS5 proxy as host:port
    pub proxy: String,

    /// Destination as host:port, reached through the proxy
    pub target: String,

    /// Bytes to send once the tunnel is up; the reply is copied to stdout
    #[arg(long, value_name = "DATA")]
    pub send: Option<String>,
}

fn split_target(target: &str) -> anyhow::Result<(String, u16)> {
    let (host, port) = target
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("target '{}' must be host:port", target))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(anyhow!("missing host in target '{}'", target));
    }
    let port = port
        .parse::<u16>()
        .with_context(|| format!("invalid port in target '{}'", target))?;
    Ok((host.to_string(), port))
}

pub fn run(services: &Services, config: &Config, args: ConnectArgs) -> anyhow::Result<()> {
    let proxy: Proxy = args.proxy.parse().map_err(|e: String| anyhow!(e))?;
    let (host, port) = split_target(&args.target)?;

    let socket = Socks5Socket::new(config.connector.credentials());
    let mut machine = services.connector.connect(socket, proxy, host, port);

    let started = Instant::now();
    while !machine.is_ready() {
        if let Err(e) = machine.poll() {
            error!(proxy = %machine.proxy(), step = %machine.state(), error = %e, "Connection failed");
            machine.stop();
            return Err(e.into());
        }
        if !machine.is_ready() {
            thread::sleep(POLL_INTERVAL);
        }
    }

    info!(
        proxy = %machine.proxy(),
        destination = %args.target,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Tunnel ready"
    );

    let mut socket = machine.into_socket();
    if let Some(bound) = socket.bound_addr() {
        println!("connected to {} (proxy bound {})", args.target, bound);
    } else {
        println!("connected to {}", args.target);
    }

    if let Some(payload) = args.send {
        let buffered = socket.take_buffered();
        let mut stream = socket.into_tcp_stream()?;
        stream.write_all(payload.as_bytes())?;

        let mut stdout = io::stdout().lock();
        stdout.write_all(&buffered)?;
        let mut chunk = [0u8; 4096];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => stdout.write_all(&chunk[..n])?,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => break,
                Err(e) => return Err(e.into()),
            }
        }
        stdout.flush()?;
    }

    Ok(())
}
