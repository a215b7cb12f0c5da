use std::{
    io::{self, ErrorKind, Write},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
    thread,
    time::Duration,
};

use tracing::{error, info, span, warn, Level, Span};

use crate::{
    method::HttpMethod,
    request::{BodyTooLarge, EndOfFile, Request, RequestReader},
    response_writer::ResponseWriter,
    status::StatusCode,
};

pub trait Handler {
    fn handle(&self, w: &mut ResponseWriter, r: &mut Request);
}

impl<T> Handler for T
where
    T: Fn(&mut ResponseWriter, &mut Request),
{
    fn handle(&self, w: &mut ResponseWriter, r: &mut Request) {
        self(w, r)
    }
}

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    read_timeout: Option<Duration>,
}

impl Server {
    pub fn new(addr: impl ToSocketAddrs) -> anyhow::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr)?,
            read_timeout: Some(Duration::from_secs(10)),
        })
    }

    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves connections until the listener fails, one scoped thread per
    /// connection.
    pub fn run(&self, handler: impl Handler + Sync) {
        let handler = &handler;
        thread::scope(|s| {
            for stream in self.listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(err) => {
                        error!(?err);
                        continue;
                    }
                };

                s.spawn(move || {
                    let span = create_conn_span(&stream);
                    let _guard = span.enter();
                    info!("new conn");

                    if let Err(err) = handle_connection(stream, self.read_timeout, handler) {
                        error!(?err);
                    }

                    info!("conn end");
                });
            }
        });
    }
}

#[derive(Debug)]
enum ConnCtrl {
    KeepAlive,
    Close,
}

fn handle_connection(
    stream: TcpStream,
    read_timeout: Option<Duration>,
    handler: &impl Handler,
) -> anyhow::Result<()> {
    let (reader, writer) = (&stream, &stream);
    reader.set_read_timeout(read_timeout)?;
    let mut request_reader = RequestReader::new(reader);

    loop {
        match handle_request(&mut request_reader, writer, handler)? {
            ConnCtrl::KeepAlive => continue,
            ConnCtrl::Close => return Ok(()),
        }
    }
}

fn handle_request(
    request_reader: &mut RequestReader<&TcpStream>,
    mut writer: &TcpStream,
    handler: &impl Handler,
) -> anyhow::Result<ConnCtrl> {
    let mut r = match request_reader.read() {
        Ok(r) => r,
        Err(err) => {
            if err.downcast_ref::<EndOfFile>().is_some() {
                return Ok(ConnCtrl::Close);
            }

            warn!(?err);
            let status = if is_timeout(&err) {
                StatusCode::RequestTimeout
            } else if err.downcast_ref::<BodyTooLarge>().is_some() {
                StatusCode::ContentTooLarge
            } else {
                StatusCode::BadRequest
            };
            let mut w = ResponseWriter::new_empty();
            w.error(status, status.reason_phrase());
            w.set_header("Connection", "close");
            writer.write_all(&w.write(true))?;
            return Ok(ConnCtrl::Close);
        }
    };

    let span = create_req_span(&r);
    let _guard = span.enter();
    info!(?r);

    let conn_ctrl = if r
        .get_headers()
        .get_connection()
        .any(|val| val.eq_ignore_ascii_case("close"))
    {
        ConnCtrl::Close
    } else {
        ConnCtrl::KeepAlive
    };

    let include_body = r.get_http_method() != HttpMethod::Head.as_str();
    let mut w = ResponseWriter::new_empty();
    handler.handle(&mut w, &mut r);
    info!(status_code = w.get_status_code(), "response");
    writer.write_all(&w.write(include_body))?;
    Ok(conn_ctrl)
}

fn is_timeout(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|err| matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut))
}

fn create_conn_span(stream: &TcpStream) -> Span {
    let peer_addr = match stream.peer_addr() {
        Ok(addr) => addr.to_string(),
        Err(err) => {
            error!(?err);
            "unknown".to_owned()
        }
    };

    span!(Level::INFO, "conn", peer_addr = %peer_addr)
}

fn create_req_span(r: &Request) -> Span {
    span!(
        Level::INFO,
        "req",
        method = r.get_http_method(),
        target = %r.get_request_target()
    )
}

#[cfg(test)]
pub fn noop_handler() -> impl Handler + Send + Sync {
    |_: &mut ResponseWriter, _: &mut Request| {}
}
