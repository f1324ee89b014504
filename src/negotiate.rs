// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 内容协商模块
//!
//! 根据请求的 `Accept` 标头在 HTML 与 JSON 两种表示之间做出选择，
//! 并生成最终的响应体。只看 `Accept` 中的第一个媒体类型，忽略质量参数。

use crate::{
    param::{DEFAULT_MEDIA_TYPE, MEDIA_TYPE_JSON, PARAM_EMAIL, PARAM_NAME},
    render::Representation,
    request::ParsedRequest,
    util::HtmlBuilder,
};

use bytes::Bytes;

/// 内容协商的结果，响应写出后即被丢弃
#[derive(Debug, Clone)]
pub struct Negotiation {
    representation: Representation,
    /// 渲染器产生的原始负载
    payload: String,
    /// 最终响应体的 UTF-8 编码
    body: Bytes,
    content_type: &'static str,
}

/// 从 `Accept` 标头值中提取有效媒体类型。
///
/// 取逗号分隔的第一个条目，再去掉 `;` 之后的参数，结果为小写。
/// 没有 `Accept` 标头时返回 `text/html`。
pub fn effective_media_type(accept: Option<&str>) -> String {
    match accept {
        Some(value) => {
            let value = value.trim().to_lowercase();
            let first = value.split(',').next().unwrap_or("");
            first.split(';').next().unwrap_or("").trim().to_string()
        }
        None => DEFAULT_MEDIA_TYPE.to_string(),
    }
}

/// 为请求选择表示并构建响应体
pub fn negotiate(request: &ParsedRequest) -> Negotiation {
    let name = request.param(PARAM_NAME);
    let email = request.param(PARAM_EMAIL);

    let media_type = effective_media_type(request.accept());
    let representation = if media_type.eq_ignore_ascii_case(MEDIA_TYPE_JSON) {
        Representation::Json
    } else {
        Representation::Html
    };

    let payload = representation.render(name, email);
    let body = match representation {
        Representation::Json => payload.trim().to_string(),
        Representation::Html => HtmlBuilder::new(
            &request.raw_text(),
            &Representation::Html.to_string(),
            &payload,
        )
        .build()
        .trim()
        .to_string(),
    };

    Negotiation {
        representation,
        payload,
        body: Bytes::from(body),
        content_type: representation.content_type(),
    }
}

impl Negotiation {
    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::read_request;

    async fn negotiate_raw(raw: &str) -> Negotiation {
        let mut reader = raw.as_bytes();
        let request = read_request(&mut reader, 0).await.unwrap();
        negotiate(&request)
    }

    #[test]
    fn test_effective_media_type() {
        assert_eq!(effective_media_type(None), "text/html");
        assert_eq!(effective_media_type(Some("application/json")), "application/json");
        assert_eq!(effective_media_type(Some(" Application/JSON ")), "application/json");
        assert_eq!(
            effective_media_type(Some("application/json;q=0.9,text/html")),
            "application/json"
        );
        assert_eq!(
            effective_media_type(Some("text/html, application/json")),
            "text/html"
        );
        assert_eq!(effective_media_type(Some("")), "");
    }

    #[tokio::test]
    async fn test_json_branch() {
        let n = negotiate_raw("GET /?nome=Ana&email=ana@x.com HTTP/1.1\r\nAccept: application/json\r\n\r\n").await;
        assert_eq!(n.representation(), Representation::Json);
        assert_eq!(n.content_type(), "application/json; charset=UTF-8");
        assert_eq!(&n.body()[..], br#"{"nome": "Ana", "email": "ana@x.com"}"#);
    }

    #[tokio::test]
    async fn test_json_branch_case_and_quality() {
        let n = negotiate_raw("GET /?nome=Ana HTTP/1.1\r\naccept: APPLICATION/JSON;q=0.9,text/html\r\n\r\n").await;
        assert_eq!(n.representation(), Representation::Json);
    }

    #[tokio::test]
    async fn test_html_branch_with_accept() {
        let n = negotiate_raw("GET /?nome=Ana&email=ana@x.com HTTP/1.1\r\nAccept: text/html\r\n\r\n").await;
        assert_eq!(n.representation(), Representation::Html);
        assert_eq!(n.content_type(), "text/html; charset=UTF-8");
        let body = std::str::from_utf8(n.body()).unwrap();
        assert!(body.contains("Nome: Ana"));
        assert!(body.contains("Email: ana@x.com"));
        assert!(body.contains("&lt;p&gt;Nome: Ana&lt;/p&gt;"));
        assert!(body.contains("GET /?nome=Ana&amp;email=ana@x.com HTTP/1.1"));
        assert!(body.contains("Accept: text/html"));
    }

    #[tokio::test]
    async fn test_missing_accept_defaults_to_html() {
        let n = negotiate_raw("GET /?nome=Ana HTTP/1.1\r\nHost: x\r\n\r\n").await;
        assert_eq!(n.representation(), Representation::Html);
    }

    #[tokio::test]
    async fn test_unknown_accept_falls_back_to_html() {
        let n = negotiate_raw("GET / HTTP/1.1\r\nAccept: text/plain\r\n\r\n").await;
        assert_eq!(n.representation(), Representation::Html);
    }

    /// 冒号前带空白的 Accept 行不被识别
    #[tokio::test]
    async fn test_accept_with_space_before_colon_is_ignored() {
        let n = negotiate_raw("GET /?nome=Ana HTTP/1.1\r\nAccept : application/json\r\n\r\n").await;
        assert_eq!(n.representation(), Representation::Html);
        assert_eq!(n.content_type(), "text/html; charset=UTF-8");
    }

    #[tokio::test]
    async fn test_missing_params_render_empty() {
        let n = negotiate_raw("GET / HTTP/1.1\r\nAccept: application/json\r\n\r\n").await;
        assert_eq!(&n.body()[..], br#"{"nome": "", "email": ""}"#);
    }

    /// 请求中的标记字符在页面中必须被转义
    #[tokio::test]
    async fn test_html_escapes_markup_in_request() {
        let n = negotiate_raw("GET /?nome=%3Cb%3E HTTP/1.1\r\nX-Test: <i>'\"\r\n\r\n").await;
        let body = std::str::from_utf8(n.body()).unwrap();
        assert!(body.contains("X-Test: &lt;i&gt;&#39;&quot;"));
        assert!(body.contains("Nome: &lt;b&gt;"));
        assert!(!body.contains("<b>"));
        assert!(!body.contains("<i>"));
    }

    #[tokio::test]
    async fn test_html_body_is_trimmed() {
        let n = negotiate_raw("GET / HTTP/1.1\r\n\r\n").await;
        let body = std::str::from_utf8(n.body()).unwrap();
        assert_eq!(body, body.trim());
        assert_eq!(n.payload(), "<p>Nome: </p>\n<p>Email: </p>");
    }

    #[tokio::test]
    async fn test_body_is_utf8_encoded() {
        let n = negotiate_raw("GET /?nome=Jo%C3%A3o HTTP/1.1\r\nAccept: application/json\r\n\r\n").await;
        let expected = r#"{"nome": "João", "email": ""}"#;
        assert_eq!(n.body().len(), expected.len());
        assert_eq!(&n.body()[..], expected.as_bytes());
    }
}
