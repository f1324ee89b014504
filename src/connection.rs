// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接处理器
//!
//! 负责单个连接的完整生命周期：读取请求 → 内容协商 → 写出响应 → 关闭。
//!
//! 状态流转：
//! `ReadingRequestLine → ReadingHeaders → ReadingBody（可选） → Negotiating → WritingResponse → Closed`
//!
//! `Connection` 拥有底层流，无论在哪个阶段返回（包括读写出错），
//! 流都会在 `Connection` 被丢弃时释放，对 TCP 而言即关闭套接字。

use crate::{
    config::Config,
    exception::Exception,
    negotiate::negotiate,
    request::{read_body, read_headers, read_request_line, ParsedRequest},
    response::Response,
};

use log::{debug, error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use std::{fmt, sync::Arc, time::Instant};

/// 连接所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    ReadingRequestLine,
    ReadingHeaders,
    /// 只有声明了 `Content-Length` 时才会进入
    ReadingBody,
    Negotiating,
    WritingResponse,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConnectionState::ReadingRequestLine => write!(f, "ReadingRequestLine"),
            ConnectionState::ReadingHeaders => write!(f, "ReadingHeaders"),
            ConnectionState::ReadingBody => write!(f, "ReadingBody"),
            ConnectionState::Negotiating => write!(f, "Negotiating"),
            ConnectionState::WritingResponse => write!(f, "WritingResponse"),
            ConnectionState::Closed => write!(f, "Closed"),
        }
    }
}

pub struct Connection<S> {
    stream: BufReader<S>,
    id: u128,
    config: Arc<Config>,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, id: u128, config: Arc<Config>) -> Self {
        Self {
            stream: BufReader::new(stream),
            id,
            config,
            state: ConnectionState::ReadingRequestLine,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// 处理整个连接，并在结束时记录结果。
    ///
    /// 该函数不会返回错误：所有异常都被记录到日志，连接随后关闭。
    pub async fn run(mut self) {
        let id = self.id;
        match self.serve().await {
            Ok(()) => {}
            Err(e) if e.is_silent_abort() => {
                warn!("[ID{}]{}，不发送响应直接关闭连接", id, e);
            }
            Err(e) => {
                error!("[ID{}]处理连接时发生错误（阶段：{}）：{}", id, self.state, e);
            }
        }
        self.transition(ConnectionState::Closed);
    }

    /// 依次执行各阶段，任一阶段失败即中止
    pub async fn serve(&mut self) -> Result<(), Exception> {
        let start_time = Instant::now();

        let request = self.read().await?;
        debug!("[ID{}]HTTP请求接收完毕", self.id);

        self.transition(ConnectionState::Negotiating);
        let response = self.respond(&request);

        self.transition(ConnectionState::WritingResponse);
        self.write_response(&response).await?;

        debug!(
            "[ID{}]HTTP响应发送完成，服务端用时{}ms。",
            self.id,
            start_time.elapsed().as_millis()
        );
        info!(
            "[ID{}] {}, {}, {}, {}, {}, {}",
            self.id,
            request.method(),
            request.path(),
            request.version(),
            response.content_type(),
            response.status_code(),
            response.content_length(),
        );
        Ok(())
    }

    async fn read(&mut self) -> Result<ParsedRequest, Exception> {
        let request_line = read_request_line(&mut self.stream, self.id).await?;

        self.transition(ConnectionState::ReadingHeaders);
        let header_block = read_headers(&mut self.stream, self.id).await?;

        let body = match header_block.body_length() {
            0 => Default::default(),
            length => {
                self.transition(ConnectionState::ReadingBody);
                read_body(&mut self.stream, length, self.id).await?
            }
        };
        ParsedRequest::assemble(request_line, header_block, body)
    }

    fn respond(&self, request: &ParsedRequest) -> Response {
        let negotiation = negotiate(request);
        debug!(
            "[ID{}]选择的表示：{}，响应体{}字节",
            self.id,
            negotiation.representation(),
            negotiation.body().len()
        );
        Response::from_negotiation(&negotiation, self.config.server_name())
    }

    /// 先写出并刷新响应头，再写出并刷新响应体。
    ///
    /// 分两次写出只是实现上的选择，对单个字节流而言并不是协议要求。
    async fn write_response(&mut self, response: &Response) -> Result<(), Exception> {
        let stream = self.stream.get_mut();
        stream.write_all(&response.header_bytes()).await?;
        stream.flush().await?;

        stream.write_all(response.content()).await?;
        stream.flush().await?;

        // 响应已完整写出，此时对端可能已经关闭，关闭写端失败不算错误
        if let Err(e) = stream.shutdown().await {
            debug!("[ID{}]关闭写端失败：{}", self.id, e);
        }
        Ok(())
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!("[ID{}]{} -> {}", self.id, self.state, next);
        self.state = next;
    }
}

/// 处理一个连接的便捷入口
pub async fn handle_connection<S>(stream: S, id: u128, config: Arc<Config>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    Connection::new(stream, id, config).run().await;
}
