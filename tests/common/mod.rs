//! Minimal HTTP backend for integration tests

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

/// Body served for a successful request: two days, keyed and flat sequences mixed
pub const TWO_DAY_BODY: &str = r#"{
    "dates": ["2024-01-01", "2024-01-02"],
    "dailyWeatherCode": {"0": 3, "1": 61},
    "dailyMaxTemp": [7.849, 9.0],
    "dailyMinTemp": [1.0, -0.04],
    "dailySunrise": ["08:05", "08:05"],
    "dailySunset": ["16:20", "16:21"],
    "dailyUVIndex": [0.5, 1.0],
    "hourlyTemp": [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0, 18.0, 19.0, 20.0, 21.0, 22.0, 23.0,
                   24.0, 25.0, 26.0, 27.0, 28.0, 29.0, 30.0, 31.0, 32.0, 33.0, 34.0, 35.0, 36.0, 37.0, 38.0, 39.0, 40.0, 41.0, 42.0, 43.0, 44.0, 45.0, 46.0, 47.0],
    "hourlyAppTemp": [-0.05, 0.95, 1.95, 2.95, 3.95, 4.95, 5.95, 6.95, 7.95, 8.95, 9.95, 10.95, 11.95, 12.95, 13.95, 14.95, 15.95, 16.95, 17.95, 18.95, 19.95, 20.95, 21.95, 22.95,
                      23.95, 24.95, 25.95, 26.95, 27.95, 28.95, 29.95, 30.95, 31.95, 32.95, 33.95, 34.95, 35.95, 36.95, 37.95, 38.95, 39.95, 40.95, 41.95, 42.95, 43.95, 44.95, 45.95, 46.95],
    "hourlyPrecProb": [0, 0, 0, 0, 0, 0, 10, 10, 10, 10, 10, 10, 20, 20, 20, 20, 20, 20, 30, 30, 30, 30, 30, 30,
                       40, 40, 40, 40, 40, 40, 50, 50, 50, 50, 50, 50, 60, 60, 60, 60, 60, 60, 70, 70, 70, 70, 70, 70],
    "hourlyWeatherCode": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3,
                          61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61, 61],
    "hourlyWindSpeed": [5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5,
                        9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9, 9],
    "currentTemp": 4.25,
    "currentAppTemp": 1.0,
    "currentWeatherCode": 3,
    "currentWindSpeed": 12.0
}"#;

/// A canned response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// A backend that answers one connection per reply, in order
pub struct TestServer {
    pub base_url: String,
    /// Request lines (`GET /weather?... HTTP/1.1`) in arrival order
    pub requests: mpsc::Receiver<String>,
}

/// Starts a backend on an ephemeral port
pub fn serve(replies: Vec<Reply>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
    let (tx, requests) = mpsc::channel();

    thread::spawn(move || {
        for reply in replies {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                return;
            }
            // Drain headers
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) if line == "\r\n" => break,
                    Ok(_) => {}
                    Err(_) => return,
                }
            }
            let _ = tx.send(request_line.trim_end().to_string());

            let response = format!(
                "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.body.len(),
                reply.body
            );
            let mut stream = reader.into_inner();
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    TestServer { base_url, requests }
}
