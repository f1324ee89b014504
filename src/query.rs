// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 查询字符串解析模块
//!
//! 将 URL 路径中 `?` 之后的部分解析为键值映射。
//!
//! 解析规则：
//! 1. 没有 `?`，或 `?` 是最后一个字符时，返回空映射。
//! 2. 参数对之间以 `&` 分隔，空参数对被跳过。
//! 3. 每个参数对在第一个 `=` 处切分；没有 `=` 时整个参数对是键，值为空字符串。
//! 4. 键和值都做纯百分号解码（`+` 不会被解码为空格）。
//! 5. 同一个键出现多次时，以最后一次出现的值为准。

use std::{borrow::Cow, collections::HashMap};

/// 解析 URL 路径（可能包含查询字符串）中的查询参数。
///
/// ```
/// use simple_webserver::query::parse_query;
///
/// let params = parse_query("/path?nome=Fulano&email=fulano%40mail.com");
/// assert_eq!(params["nome"], "Fulano");
/// assert_eq!(params["email"], "fulano@mail.com");
/// ```
pub fn parse_query(url_path: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let query = match url_path.split_once('?') {
        Some((_, q)) if !q.is_empty() => q,
        _ => return map,
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        map.insert(
            percent_decode(key).into_owned(),
            percent_decode(value).into_owned(),
        );
    }
    map
}

/// 百分号解码。
///
/// 不含 `%` 时直接借用原字符串。`%` 后不是两位十六进制数字时原样保留；
/// 解码得到的字节序列若不是合法 UTF-8，则按有损方式转换。
pub fn percent_decode(s: &str) -> Cow<'_, str> {
    if !s.contains('%') {
        return Cow::Borrowed(s);
    }

    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                result.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        result.push(bytes[i]);
        i += 1;
    }

    Cow::Owned(String::from_utf8_lossy(&result).into_owned())
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
