#![allow(unused_crate_dependencies)]

use std::io::{BufReader, Write};
use std::sync::Arc;
use std::thread;

#[allow(dead_code)]
mod support;

#[test]
fn parallel_hostname_test() {
    let index = support::TempIndex::create("parallel.html", b"x");
    let server = Arc::new(support::serve_pages(&index.path));
    let expected = hostpage::system_hostname().unwrap();

    let mut handles = Vec::new();

    for _ in 0..50 {
        let server = Arc::clone(&server);
        handles.push(thread::spawn(move || {
            let mut stream = support::create_client(server.server_addr());

            write!(
                stream,
                "GET /hostname HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
            )
            .unwrap();

            let response = support::read_response(&mut BufReader::new(stream));
            assert_eq!(response.status, 200);
            response.body
        }));
    }

    for handle in handles {
        let body = handle.join().unwrap();
        assert_eq!(body, expected.as_bytes());
    }
}

#[test]
fn parallel_index_test() {
    let index = support::TempIndex::create("parallel-index.html", b"same bytes for everyone");
    let server = Arc::new(support::serve_pages(&index.path));

    let mut handles = Vec::new();

    for _ in 0..16 {
        let server = Arc::clone(&server);
        handles.push(thread::spawn(move || {
            let mut stream = support::create_client(server.server_addr());

            write!(
                stream,
                "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
            )
            .unwrap();

            support::read_response(&mut BufReader::new(stream)).body
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"same bytes for everyone");
    }
}
