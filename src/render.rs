// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 响应表示渲染模块
//!
//! 服务器支持两种响应表示：HTML 片段与 JSON 对象。
//! 两者都只依赖 `name` 与 `email` 两个值。

use crate::param::{CONTENT_TYPE_HTML, CONTENT_TYPE_JSON};

use serde_json::Value;

use std::fmt;

/// 响应体的表示形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Html,
    Json,
}

impl Representation {
    /// 渲染负载字符串。
    ///
    /// HTML 负载不做转义，插入页面模板时才统一转义。
    /// JSON 负载中的字符串值由 `serde_json` 转义，保证输出总是合法的 JSON。
    pub fn render(&self, name: &str, email: &str) -> String {
        match self {
            Representation::Html => format!("<p>Nome: {}</p>\n<p>Email: {}</p>", name, email),
            Representation::Json => format!(
                "{{\"nome\": {}, \"email\": {}}}",
                Value::from(name),
                Value::from(email)
            ),
        }
    }

    /// 对应的 `Content-Type` 响应头取值
    pub fn content_type(&self) -> &'static str {
        match self {
            Representation::Html => CONTENT_TYPE_HTML,
            Representation::Json => CONTENT_TYPE_JSON,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Representation::Html => write!(f, "HTML"),
            Representation::Json => write!(f, "JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_html() {
        let html = Representation::Html.render("Ana", "ana@x.com");
        assert_eq!(html, "<p>Nome: Ana</p>\n<p>Email: ana@x.com</p>");
    }

    #[test]
    fn test_render_json() {
        let json = Representation::Json.render("Ana", "ana@x.com");
        assert_eq!(json, r#"{"nome": "Ana", "email": "ana@x.com"}"#);
    }

    #[test]
    fn test_render_json_escapes_quotes() {
        let json = Representation::Json.render("Jo\"ão", "a\\b");
        assert_eq!(json, r#"{"nome": "Jo\"ão", "email": "a\\b"}"#);
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nome"], "Jo\"ão");
    }

    #[test]
    fn test_render_json_escapes_control_characters() {
        let json = Representation::Json.render("a\nb\t", "\u{1}");
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nome"], "a\nb\t");
        assert_eq!(value["email"], "\u{1}");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(Representation::Html.content_type(), "text/html; charset=UTF-8");
        assert_eq!(Representation::Json.content_type(), "application/json; charset=UTF-8");
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Representation::Html.to_string(), "HTML");
        assert_eq!(Representation::Json.to_string(), "JSON");
    }

    proptest! {
        #[test]
        fn prop_json_always_valid(name in any::<String>(), email in any::<String>()) {
            let json = Representation::Json.render(&name, &email);
            let value: Value = serde_json::from_str(&json).unwrap();
            let object = value.as_object().unwrap();
            prop_assert_eq!(object.len(), 2);
            prop_assert_eq!(object["nome"].as_str().unwrap(), name.as_str());
            prop_assert_eq!(object["email"].as_str().unwrap(), email.as_str());
        }
    }
}
