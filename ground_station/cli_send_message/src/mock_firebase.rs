// Stand-in for the realtime database during tests: a plain TCP listener on localhost that
// reads one HTTP request and answers it with a canned response.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct MockFirebase {
    pub base_url: String,
    handle: JoinHandle<String>,
}

impl MockFirebase {
    /// Answer the first request with `status` (e.g. "200 OK") and a JSON `body`.
    pub fn respond_once(status: &'static str, body: &'static str) -> MockFirebase {
        Self::spawn(move |stream, request| {
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        })
    }

    /// Accept and read the first request, then say nothing for `hold`.
    pub fn stall(hold: Duration) -> MockFirebase {
        Self::spawn(move |_stream, request| {
            thread::sleep(hold);
            request
        })
    }

    /// A base URL on a localhost port nothing is listening on.
    pub fn unused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    /// Raw text of the request the server received. Blocks until the server thread is done.
    pub fn request(self) -> String {
        self.handle.join().unwrap()
    }

    fn spawn<F>(reply: F) -> MockFirebase
    where
        F: FnOnce(&mut TcpStream, String) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            reply(&mut stream, request)
        });

        MockFirebase { base_url, handle }
    }
}

/// Read headers and as much body as Content-Length announces.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            break;
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
