pub use config::Config;
pub use method::HttpMethod;
pub use params::Params;
pub use request::Request;
pub use response_writer::ResponseWriter;
pub use router::{Dispatch, Router};
pub use server::{Handler, Server};
pub use status::StatusCode;

pub mod config;
pub mod headers;
pub mod method;
pub mod multi_map;
pub mod params;
pub mod request;
pub mod response_writer;
pub mod router;
pub mod server;
pub mod status;
#[cfg(test)]
mod test_utils;

fn home(w: &mut ResponseWriter, _: &mut Request) {
    w.set_status(StatusCode::Ok);
}

fn echo_word(w: &mut ResponseWriter, r: &mut Request) {
    let query = r.query();
    let Some(word) = query.get_path_param("word") else {
        w.error(StatusCode::BadRequest, "missing word");
        return;
    };
    w.set_status(StatusCode::Ok);
    w.set_body_str(word);
}

fn echo_body(w: &mut ResponseWriter, r: &mut Request) {
    let body = r.get_body().unwrap_or_default().to_vec();
    w.set_status(StatusCode::Ok);
    w.set_body(body, "application/octet-stream");
}

fn user_agent(w: &mut ResponseWriter, r: &mut Request) {
    let Some(user_agent) = r.get_headers().get_user_agent() else {
        w.error(StatusCode::BadRequest, "missing User-Agent");
        return;
    };
    w.set_status(StatusCode::Ok);
    w.set_body_str(user_agent);
}

pub fn demo_router() -> Router {
    let mut router = Router::new();
    router.get("^/$", home);
    router.get("^/echo/(?P<word>[^/#?]+)$", echo_word);
    router.post("^/echo$", echo_body);
    router.get("^/user-agent$", user_agent);
    router
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let server = Server::new(config.addr)?.with_read_timeout(config.read_timeout());
    tracing::info!(addr = %server.local_addr()?, "listening");
    server.run(demo_router());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{request::Request, response_writer::ResponseWriter};

    use super::demo_router;

    fn run(http_method: &str, target: &str, body: Option<&str>) -> ResponseWriter {
        let router = demo_router();
        let mut w = ResponseWriter::new_empty();
        let mut r = Request::new(http_method, target);
        r.get_headers_mut().insert("User-Agent", "test-agent");
        if let Some(body) = body {
            r.set_body(body.to_owned());
        }
        router.handle(&mut w, &mut r);
        w
    }

    #[test]
    fn test_demo_routes() {
        let tests = [
            ("GET", "/", None, 200, ""),
            ("HEAD", "/", None, 200, ""),
            ("GET", "/echo/abc", None, 200, "abc"),
            ("GET", "/echo/a%20b", None, 200, "a b"),
            ("POST", "/echo", Some("payload"), 200, "payload"),
            ("GET", "/user-agent", None, 200, "test-agent"),
            ("GET", "/echo", None, 405, "Method Not Allowed"),
            ("DELETE", "/", None, 405, "Method Not Allowed"),
            ("GET", "/nope", None, 404, "404 page not found"),
        ];

        for (http_method, target, body, status_code, want) in tests {
            let w = run(http_method, target, body);
            assert_eq!(w.get_status_code(), Some(status_code), "{http_method} {target}");
            assert_eq!(w.get_body(), want.as_bytes(), "{http_method} {target}");
        }
    }
}
