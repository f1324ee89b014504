// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 服务器遵循的 HTTP 协议常量：换行符、固定的状态行、媒体类型以及默认值。

/// HTTP 协议规定的换行符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// 服务器名称标识的默认值，用于 HTTP 响应头的 `Server` 字段
pub const SERVER_NAME: &str = "Custom Server";

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 8080;

/// 默认的工作池大小（同时处理的连接数上限）
pub const DEFAULT_POOL_SIZE: usize = 10;

/// 响应使用的协议版本
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// 本服务器只会产生这一个状态码
pub const STATUS_OK: u16 = 200;

/// 与 `STATUS_OK` 对应的原因短语
pub const STATUS_OK_REASON: &str = "OK";

/// 缺少 `Accept` 头时使用的媒体类型
pub const DEFAULT_MEDIA_TYPE: &str = "text/html";

/// 触发 JSON 表示的媒体类型
pub const MEDIA_TYPE_JSON: &str = "application/json";

/// HTML 表示的 `Content-Type`
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=UTF-8";

/// JSON 表示的 `Content-Type`
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// 查询参数中的姓名字段
pub const PARAM_NAME: &str = "nome";

/// 查询参数中的邮箱字段
pub const PARAM_EMAIL: &str = "email";
