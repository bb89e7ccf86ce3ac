use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use rolodex_navigation::Contact;
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, ContactApi, Fields};

const BODY_PREVIEW: usize = 200;

/// Talks json to a contact resource, e.g. `http://localhost:8080/api`.
pub struct HttpContactApi {
    http: Client,
    base_url: Url,
}

impl HttpContactApi {
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBase(base_url.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url: base_url.clone(),
        })
    }

    /// `{base}/contacts/{segments..}`, every segment percent encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("contacts").extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = self.receive(request).await?;
        serde_json::from_str(&text).map_err(|error| ApiError::Decode(error.to_string()))
    }

    /// Like `send`, but an empty success body decodes to `None`.
    async fn send_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let text = self.receive(request).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|error| ApiError::Decode(error.to_string()))
    }

    async fn receive(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|error| ApiError::Transport(error.to_string()))?;

        checked(response).await
    }
}

async fn checked(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|error| ApiError::Transport(error.to_string()))?;

    if !status.is_success() {
        tracing::warn!("contact api returned {}", status);

        return Err(ApiError::Status {
            status: status.as_u16(),
            body: text.chars().take(BODY_PREVIEW).collect(),
        });
    }

    Ok(text)
}

#[async_trait]
impl ContactApi for HttpContactApi {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Contact>, ApiError> {
        let mut request = self.request(Method::GET, &[]);
        if let Some(query) = query.filter(|query| !query.is_empty()) {
            request = request.query(&[("query", query)]);
        }

        self.send(request).await
    }

    async fn read(&self, id: &str) -> Result<Contact, ApiError> {
        self.send(self.request(Method::GET, &[id])).await
    }

    async fn create(&self) -> Result<Contact, ApiError> {
        let request = self
            .request(Method::POST, &[])
            .json(&serde_json::json!({}));

        self.send(request).await
    }

    async fn update(&self, id: &str, fields: &Fields) -> Result<Contact, ApiError> {
        let request = self.request(Method::PUT, &[id]).json(fields);

        self.send(request).await
    }

    async fn favorite(&self, id: &str, favorite: bool) -> Result<Contact, ApiError> {
        let request = self
            .request(Method::PUT, &[id, "favorite"])
            .json(&favorite);

        self.send(request).await
    }

    async fn delete(&self, id: &str) -> Result<Option<Contact>, ApiError> {
        self.send_optional(self.request(Method::DELETE, &[id]))
            .await
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    /// Answers exactly one request with `response` and hands back the raw
    /// request it received.
    async fn serve(response: String) -> (HttpContactApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bound");
        let address = listener.local_addr().expect("address");

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.expect("accepted");

            let mut request = Vec::new();
            let mut buffer = [0; 1024];
            while !is_complete(&request) {
                let read = stream.read(&mut buffer).await.expect("read");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }

            stream
                .write_all(response.as_bytes())
                .await
                .expect("written");
            let _ = stream.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        let base = Url::parse(&format!("http://{}/api", address)).expect("valid url");
        (HttpContactApi::new(&base).expect("api"), handle)
    }

    fn is_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let (head, body) = match text.split_once("\r\n\r\n") {
            Some(it) => it,
            None => return false,
        };

        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        body.len() >= length
    }

    fn response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    fn request_body(request: &str) -> &str {
        request
            .split_once("\r\n\r\n")
            .map(|(_, body)| body)
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn list_sends_query_and_decodes_contacts() {
        let (api, server) = serve(response(
            "200 OK",
            r#"[{"id": 1, "first": "Alex", "last": "Anderson"}]"#,
        ))
        .await;

        let contacts = api.list(Some("al")).await.expect("listed");
        let request = server.await.expect("served");

        assert_eq!("GET /api/contacts?query=al HTTP/1.1", request_line(&request));
        assert_eq!(1, contacts.len());
        assert_eq!("1", contacts[0].id);
        assert_eq!(Some("Alex Anderson".to_string()), contacts[0].full());
    }

    #[tokio::test]
    async fn favorite_puts_a_json_boolean() {
        let (api, server) = serve(response("200 OK", r#"{"id": "4", "favorite": true}"#)).await;

        let contact = api.favorite("4", true).await.expect("favorite");
        let request = server.await.expect("served");

        assert_eq!("PUT /api/contacts/4/favorite HTTP/1.1", request_line(&request));
        assert_eq!("true", request_body(&request));
        assert!(contact.favorite);
    }

    #[tokio::test]
    async fn error_status_keeps_a_body_preview() {
        let body = "x".repeat(BODY_PREVIEW + 50);
        let (api, server) = serve(response("404 Not Found", &body)).await;

        let result = api.read("4").await;
        server.await.expect("served");

        assert_eq!(
            Err(ApiError::Status {
                status: 404,
                body: "x".repeat(BODY_PREVIEW),
            }),
            result
        );
    }

    #[tokio::test]
    async fn delete_accepts_empty_success() {
        let (api, server) = serve(
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string(),
        )
        .await;

        let result = api.delete("4").await;
        let request = server.await.expect("served");

        assert_eq!("DELETE /api/contacts/4 HTTP/1.1", request_line(&request));
        assert_eq!(Ok(None), result);
    }

    #[tokio::test]
    async fn delete_decodes_returned_record() {
        let (api, server) = serve(response("200 OK", r#"{"id": "4"}"#)).await;

        let result = api.delete("4").await;
        server.await.expect("served");

        assert_eq!(Ok(Some(Contact::new("4"))), result);
    }

    #[test]
    fn ids_are_encoded_as_one_segment() {
        let base = Url::parse("http://localhost:8080/api/").expect("valid url");
        let api = HttpContactApi::new(&base).expect("api");

        assert_eq!(
            "http://localhost:8080/api/contacts/a%2Fb%3Fc%23d/favorite",
            api.url(&["a/b?c#d", "favorite"]).as_str()
        );
        assert_eq!("http://localhost:8080/api/contacts", api.url(&[]).as_str());
    }

    #[test]
    fn opaque_base_is_refused() {
        let base = Url::parse("mailto:contacts@example.com").expect("valid url");
        assert!(matches!(
            HttpContactApi::new(&base),
            Err(ApiError::InvalidBase(_))
        ));
    }
}
