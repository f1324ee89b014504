// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求读取模块
//!
//! 负责从 TCP 流中按行读取 HTTP 请求，并构建只读的 `ParsedRequest`。
//! 读取过程分为三个阶段：
//! 1. 请求行（`METHOD PATH VERSION`），只读取一行。
//! 2. 标头，逐行读取直到空行；每一行都原样追加到原始标头块中。
//! 3. 请求体（可选），按 `Content-Length` 读取固定长度的字节。
//!
//! 方法与协议版本只做记录，不做校验。

use crate::{exception::Exception, param::CRLF, query::parse_query};

use bytes::Bytes;
use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use std::collections::HashMap;

/// 预分配请求体缓冲区的上限，避免客户端声明超大长度时一次性分配内存
const BODY_PREALLOC_LIMIT: usize = 64 * 1024;

/// 请求行或单个标头行的最大字节数（含行结束符）
const MAX_LINE_LENGTH: usize = 8 * 1024;

const CONTENT_LENGTH_PREFIX: &str = "content-length:";
const ACCEPT_PREFIX: &str = "accept:";

/// 一个完整读取的 HTTP 请求。
///
/// 每个连接创建一次，创建后不再修改，连接关闭时随之销毁。
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    /// 请求方法，原样保留（不校验）
    method: String,
    /// 请求路径（包含查询字符串）
    path: String,
    /// 协议版本，请求行中缺失时为空字符串
    version: String,
    /// 去掉行结束符的请求行
    request_line: String,
    /// 原样拼接的标头行（包括各自的行结束符）
    raw_headers: String,
    /// 按出现顺序排列的 (名称, 值) 对
    headers: Vec<(String, String)>,
    /// 从路径中解析出的查询参数
    query_params: HashMap<String, String>,
    /// 实际读取到的请求体，可能短于声明的长度
    body: Bytes,
    /// `Content-Length` 声明的长度，缺失时为 0
    body_length: usize,
}

/// 一个请求的标头部分
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderBlock {
    /// 原样拼接的标头行
    raw: String,
    /// 按出现顺序排列的 (名称, 值) 对
    headers: Vec<(String, String)>,
    /// `Content-Length` 声明的长度
    body_length: usize,
}

impl HeaderBlock {
    pub(crate) fn body_length(&self) -> usize {
        self.body_length
    }
}

/// 从流中读取一个请求。
///
/// # 错误处理
/// - 读到任何请求行之前流就结束：`Exception::EmptyRequest`
/// - `Content-Length` 不是非负整数：`Exception::InvalidContentLength`
/// - 请求行中没有路径或路径为空：`Exception::MissingPath`
/// - 单行超过长度上限：`Exception::LineTooLong`
/// - 底层读取失败：`Exception::Io`
pub async fn read_request<R>(reader: &mut R, id: u128) -> Result<ParsedRequest, Exception>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = read_request_line(reader, id).await?;
    let header_block = read_headers(reader, id).await?;
    let body = read_body(reader, header_block.body_length(), id).await?;
    ParsedRequest::assemble(request_line, header_block, body)
}

/// 读取请求行，返回去掉行结束符的内容
pub(crate) async fn read_request_line<R>(reader: &mut R, id: u128) -> Result<String, Exception>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader).await? {
        Some(line) => strip_line_ending(&line).to_string(),
        None => return Err(Exception::EmptyRequest),
    };
    debug!("[ID{}]请求行：{}", id, request_line);
    Ok(request_line)
}

/// 逐行读取标头直到空行或流结束
pub(crate) async fn read_headers<R>(reader: &mut R, id: u128) -> Result<HeaderBlock, Exception>
where
    R: AsyncBufRead + Unpin,
{
    let mut block = HeaderBlock::default();
    while let Some(line) = read_line(reader).await? {
        let content = strip_line_ending(&line);
        if content.is_empty() {
            break;
        }
        // 按行首前缀识别，重复出现时以最后一个为准
        if let Some(value) = strip_prefix_ignore_case(content, CONTENT_LENGTH_PREFIX) {
            block.body_length = parse_content_length(value.trim())?;
        }
        let (name, value) = match content.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (content, ""),
        };
        block.headers.push((name.to_string(), value.to_string()));
        block.raw.push_str(&line);
    }
    debug!(
        "[ID{}]读取到{}个标头，Content-Length: {}",
        id,
        block.headers.len(),
        block.body_length
    );
    Ok(block)
}

/// 读取最多 `length` 字节的请求体。
///
/// 流提前结束时得到更短的请求体，不做补读。
pub(crate) async fn read_body<R>(reader: &mut R, length: usize, id: u128) -> Result<Bytes, Exception>
where
    R: AsyncBufRead + Unpin,
{
    if length == 0 {
        return Ok(Bytes::new());
    }
    let mut body = Vec::with_capacity(length.min(BODY_PREALLOC_LIMIT));
    (&mut *reader)
        .take(length as u64)
        .read_to_end(&mut body)
        .await?;
    if body.len() < length {
        debug!(
            "[ID{}]请求体不完整：声明{}字节，实际读取{}字节",
            id,
            length,
            body.len()
        );
    }
    Ok(Bytes::from(body))
}

/// 读取一行（包含行结束符）。流已结束时返回 `None`。
///
/// 非 UTF-8 字节按有损方式转换，不会导致读取失败。
/// 读满 `MAX_LINE_LENGTH` 仍未遇到换行符时返回 `Exception::LineTooLong`。
async fn read_line<R>(reader: &mut R) -> Result<Option<String>, Exception>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut limited = (&mut *reader).take(MAX_LINE_LENGTH as u64);
    if limited.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }
    if buf.len() == MAX_LINE_LENGTH && !buf.ends_with(b"\n") {
        return Err(Exception::LineTooLong(MAX_LINE_LENGTH));
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// 大小写不敏感地去掉前缀
fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn parse_content_length(value: &str) -> Result<usize, Exception> {
    value
        .parse::<usize>()
        .map_err(|_| Exception::InvalidContentLength(value.to_string()))
}

impl ParsedRequest {
    /// 由三个阶段的读取结果组装请求，并解析查询参数
    pub(crate) fn assemble(
        request_line: String,
        header_block: HeaderBlock,
        body: Bytes,
    ) -> Result<Self, Exception> {
        let mut parts = request_line.split(' ');
        let method = parts.next().unwrap_or("").to_string();
        let path = match parts.next() {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => return Err(Exception::MissingPath),
        };
        let version = parts.next().unwrap_or("").to_string();
        let query_params = parse_query(&path);

        Ok(Self {
            method,
            path,
            version,
            request_line,
            raw_headers: header_block.raw,
            headers: header_block.headers,
            query_params,
            body,
            body_length: header_block.body_length,
        })
    }

    /// 按名称查找标头（大小写不敏感），返回第一个匹配的值
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 第一个以 `Accept:` 开头（大小写不敏感）的标头行中冒号之后的内容
    pub fn accept(&self) -> Option<&str> {
        self.raw_headers
            .lines()
            .find_map(|line| strip_prefix_ignore_case(line, ACCEPT_PREFIX))
            .map(str::trim)
    }

    /// 按名称查找查询参数，缺失时返回空字符串
    pub fn param(&self, key: &str) -> &str {
        self.query_params.get(key).map_or("", String::as_str)
    }

    /// 重建客户端发送的原始请求文本：请求行、标头块、空行以及请求体
    pub fn raw_text(&self) -> String {
        let body = String::from_utf8_lossy(&self.body);
        [
            self.request_line.as_str(),
            CRLF,
            self.raw_headers.as_str(),
            CRLF,
            body.as_ref(),
        ]
        .concat()
    }
}

// --- Getter 访问器实现 ---

impl ParsedRequest {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 获取请求路径（含查询参数）
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn body_length(&self) -> usize {
        self.body_length
    }
}
