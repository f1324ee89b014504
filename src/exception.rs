// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 定义单个连接在处理生命周期中可能出现的异常情况。
//!
//! 所有异常都只影响当前连接：上层的连接处理器负责记录日志并关闭套接字，
//! 监听循环与其他连接不受影响。

use std::{error::Error, fmt, io};

/// 连接处理过程中发生的异常类型。
#[derive(Debug)]
pub enum Exception {
    /// 在读到任何请求行之前，客户端就关闭了输入流。
    EmptyRequest,
    /// 请求行中缺少路径，或者路径为空字符串。
    MissingPath,
    /// `Content-Length` 的值不是合法的非负整数。保存原始值便于记录日志。
    InvalidContentLength(String),
    /// 请求行或标头行在上限字节数内没有遇到换行符。保存上限值。
    LineTooLong(usize),
    /// 套接字读写失败（连接被重置、流被关闭等）。
    Io(io::Error),
}

use Exception::*;

impl Exception {
    /// 是否属于“静默中止”：不向客户端写出任何数据，直接关闭连接。
    ///
    /// 这两种情况是预期内的行为，而不是故障，因此日志级别较低。
    pub fn is_silent_abort(&self) -> bool {
        matches!(self, EmptyRequest | MissingPath)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyRequest => write!(f, "Stream ended before a request line was received"),
            MissingPath => write!(f, "Request line has no path"),
            InvalidContentLength(value) => write!(f, "Invalid Content-Length: {:?}", value),
            LineTooLong(limit) => write!(f, "Line exceeds {} bytes", limit),
            Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for Exception {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Exception {
    fn from(e: io::Error) -> Self {
        Io(e)
    }
}
