//! URL pool loading and selection through the public API.

use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use loadmon::config::{AddressFamily, PoolConfig};
use loadmon::pool::{
    next_address, next_url, same_server, PoolError, PoolLoader, RandomState, StaticResolver,
};

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn loader(family: AddressFamily) -> PoolLoader {
    let resolver = StaticResolver::new()
        .with_host("web.test", [ip("192.0.2.1"), ip("192.0.2.2")])
        .with_host("dual.test", [ip("2001:db8::1"), ip("192.0.2.7")]);
    let config = PoolConfig {
        address_family: family,
        ..PoolConfig::default()
    };
    PoolLoader::new(&config).with_resolver(Arc::new(resolver))
}

#[test]
fn file_with_invalid_third_entry_loads_nothing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in [
        "http://web.test/1",
        "http://web.test/2",
        "http://:80/",
        "http://web.test/4",
        "http://web.test/5",
    ] {
        writeln!(file, "{}", line).unwrap();
    }

    match loader(AddressFamily::Ipv4).load_file(file.path()) {
        Err(PoolError::Entry { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected entry error, got {:?}", other),
    }
}

#[test]
fn family_filter_applies_to_resolved_addresses() {
    let v4 = loader(AddressFamily::Ipv4).load_one("http://dual.test/").unwrap();
    assert_eq!(
        v4.get(0).unwrap().addresses(),
        &["192.0.2.7:80".parse::<SocketAddr>().unwrap()]
    );

    let any = loader(AddressFamily::Any).load_one("http://dual.test/").unwrap();
    assert_eq!(any.get(0).unwrap().addresses().len(), 2);

    assert!(matches!(
        loader(AddressFamily::Ipv6).load_one("http://web.test/"),
        Err(PoolError::NoAddresses { .. })
    ));
}

#[test]
fn connections_stick_to_rotating_addresses() {
    let pool = loader(AddressFamily::Ipv4)
        .load_reader("http://web.test/a\nhttp://web.test:8080/b\n".as_bytes())
        .unwrap();
    let a = pool.get(0).unwrap();
    let b = pool.get(1).unwrap();

    assert_eq!(next_address(a, 0).ip(), ip("192.0.2.1"));
    assert_eq!(next_address(a, 1).ip(), ip("192.0.2.2"));
    assert_eq!(next_address(a, 2).ip(), ip("192.0.2.1"));
    assert_eq!(next_address(b, 1).port(), 8080);
    assert!(!same_server(a, b, 0));
}

#[test]
fn random_picks_stay_inside_pool() {
    let pool = loader(AddressFamily::Ipv4)
        .load_reader("http://web.test/a\nhttp://web.test/b\nhttp://192.0.2.50/c".as_bytes())
        .unwrap();
    let mut rng = RandomState::seeded(42);

    let mut seen = [false; 3];
    for _ in 0..300 {
        let picked = next_url(&pool, &mut rng);
        let index = pool.iter().position(|u| std::ptr::eq(u, picked)).unwrap();
        seen[index] = true;
    }
    assert_eq!(seen, [true; 3]);
}
