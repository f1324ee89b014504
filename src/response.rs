use crate::{negotiate::Negotiation, param::*};

use bytes::Bytes;
use chrono::prelude::*;

/// 带完整分帧信息的 HTTP 响应。
///
/// 状态固定为 `200 OK`；`Content-Length` 总是由响应体的字节数得出，
/// 不存在单独设置长度的入口。
#[derive(Debug, Clone)]
pub struct Response {
    status_code: u16,
    information: String,
    content_type: String,
    date: DateTime<Utc>,
    server_name: String,
    content: Bytes,
}

impl Response {
    pub fn from_negotiation(negotiation: &Negotiation, server_name: &str) -> Self {
        Self {
            status_code: STATUS_OK,
            information: STATUS_OK_REASON.to_string(),
            content_type: negotiation.content_type().to_string(),
            date: Utc::now(),
            server_name: server_name.to_string(),
            content: negotiation.body().clone(),
        }
    }

    /// 固定日期，用于得到可复现的输出
    #[cfg(test)]
    pub(crate) fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// 状态行与全部响应头，以空行结尾
    pub fn header_bytes(&self) -> Vec<u8> {
        let status_code: &str = &self.status_code.to_string();
        let content_length: &str = &self.content_length().to_string();
        let date: &str = &format_date(&self.date);

        [
            HTTP_VERSION,
            " ",
            status_code,
            " ",
            self.information.as_str(),
            CRLF,
            "Date: ",
            date,
            CRLF,
            "Server: ",
            self.server_name.as_str(),
            CRLF,
            "Content-Type: ",
            self.content_type.as_str(),
            CRLF,
            "Content-Length: ",
            content_length,
            CRLF,
            "Connection: close",
            CRLF,
            CRLF,
        ]
        .concat()
        .into_bytes()
    }

    /// 完整的响应报文（头部 + 响应体）
    pub fn as_bytes(&self) -> Vec<u8> {
        [self.header_bytes().as_slice(), self.content.as_ref()].concat()
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn content_length(&self) -> usize {
        self.content.len()
    }
}

/// RFC 1123 格式的日期，例如 `Tue, 01 Jan 2024 00:00:00 GMT`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
