mod common;

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use common::SolidPng;
use hoops_roster::error::PhotoError;
use hoops_roster::photo::{HttpPhotoSource, MAX_PHOTO_BYTES, Photo, PhotoSource};
use hoops_roster::photo_cache::PhotoCache;

/// Answers every request with the same canned response and counts requests.
struct CannedServer {
    url_template: String,
    hits: Arc<AtomicUsize>,
}

impl CannedServer {
    fn start(status: &'static str, body: Vec<u8>, content_length: Option<u64>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local server");
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut line = String::new();
                while reader.read_line(&mut line).map(|n| n > 0).unwrap_or(false) {
                    if line == "\r\n" {
                        break;
                    }
                    line.clear();
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let len = content_length.unwrap_or(body.len() as u64);
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(head.as_bytes());
                if content_length.is_none() {
                    let _ = stream.write_all(&body);
                }
                let _ = stream.flush();
            }
        });

        Self {
            url_template: format!("http://{addr}/players/{{player_id}}.png"),
            hits,
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn png_bytes() -> Vec<u8> {
    SolidPng.fetch("any").unwrap()
}

#[test]
fn successful_fetch_decodes_and_fills_cache() {
    let server = CannedServer::start("200 OK", png_bytes(), None);
    let dir = tempfile::tempdir().unwrap();
    let cache = PhotoCache::new(dir.path());
    let source = HttpPhotoSource::new(server.url_template.clone()).with_cache(cache.clone());

    let photo = Photo::resolve(&source, "jamesle01");
    assert!(!photo.is_placeholder());
    assert_eq!(server.hits(), 1);
    assert_eq!(cache.get("jamesle01"), Some(png_bytes()));
}

#[test]
fn cache_hit_skips_the_network() {
    let server = CannedServer::start("200 OK", png_bytes(), None);
    let dir = tempfile::tempdir().unwrap();
    let cache = PhotoCache::new(dir.path());
    cache.put("curryst01", &png_bytes()).unwrap();
    let source = HttpPhotoSource::new(server.url_template.clone()).with_cache(cache);

    assert_eq!(source.fetch("curryst01").unwrap(), png_bytes());
    assert_eq!(server.hits(), 0);
}

#[test]
fn error_status_falls_back_to_placeholder_and_caches_nothing() {
    let server = CannedServer::start("404 Not Found", b"missing".to_vec(), None);
    let dir = tempfile::tempdir().unwrap();
    let cache = PhotoCache::new(dir.path());
    let source = HttpPhotoSource::new(server.url_template.clone()).with_cache(cache.clone());

    assert!(matches!(
        source.fetch("nobody01"),
        Err(PhotoError::Status(status)) if status.as_u16() == 404
    ));
    assert!(Photo::resolve(&source, "nobody01").is_placeholder());
    assert_eq!(server.hits(), 2);
    assert!(cache.get("nobody01").is_none());
}

#[test]
fn html_body_with_ok_status_is_not_cached() {
    let server = CannedServer::start("200 OK", b"<html>rate limited</html>".to_vec(), None);
    let dir = tempfile::tempdir().unwrap();
    let cache = PhotoCache::new(dir.path());
    let source = HttpPhotoSource::new(server.url_template.clone()).with_cache(cache.clone());

    assert!(Photo::resolve(&source, "jamesle01").is_placeholder());
    assert!(cache.get("jamesle01").is_none());

    // A retry goes back to the server instead of replaying the bad body.
    assert!(Photo::resolve(&source, "jamesle01").is_placeholder());
    assert_eq!(server.hits(), 2);
}

#[test]
fn unreadable_cache_entry_is_evicted_and_refetched() {
    let server = CannedServer::start("200 OK", png_bytes(), None);
    let dir = tempfile::tempdir().unwrap();
    let cache = PhotoCache::new(dir.path());
    cache.put("butleji01", b"<html>soft 404</html>").unwrap();
    let source = HttpPhotoSource::new(server.url_template.clone()).with_cache(cache.clone());

    assert_eq!(source.fetch("butleji01").unwrap(), png_bytes());
    assert_eq!(server.hits(), 1);
    assert_eq!(cache.get("butleji01"), Some(png_bytes()));
}

#[test]
fn oversized_body_is_refused_from_its_length_header() {
    let server = CannedServer::start("200 OK", Vec::new(), Some(MAX_PHOTO_BYTES + 1));
    let source = HttpPhotoSource::new(server.url_template.clone());

    assert!(matches!(
        source.fetch("bigbody01"),
        Err(PhotoError::TooLarge(len)) if len == MAX_PHOTO_BYTES + 1
    ));
}
