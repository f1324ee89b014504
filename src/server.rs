// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 监听器
//!
//! 顺序接受 TCP 连接，并把每个连接分派给有界工作池中的一个任务。
//! 工作池由信号量实现：许可耗尽时，新接受的连接在监听循环中等待空闲的工作者。
//! 每个任务从头到尾只处理一个连接，任务之间除只读配置外不共享任何状态。

use crate::{config::Config, connection::handle_connection};

use log::{debug, error, info};
use tokio::{net::TcpListener, sync::Semaphore};

use std::{
    future::Future,
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    sync::Arc,
    time::Duration,
};

/// 接受连接失败（例如文件描述符耗尽）后，再次尝试之前的等待时间
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: TcpListener,
    config: Arc<Config>,
    pool: Arc<Semaphore>,
}

impl Server {
    /// 按配置绑定监听地址
    pub async fn bind(config: Config) -> io::Result<Self> {
        let address = match config.local() {
            true => Ipv4Addr::new(127, 0, 0, 1),
            false => Ipv4Addr::new(0, 0, 0, 0),
        };
        let socket = SocketAddrV4::new(address, config.port());
        let listener = TcpListener::bind(socket).await?;
        info!("服务端已在{}上监听Socket连接", listener.local_addr()?);
        info!("工作池大小：{}", config.pool_size());

        Ok(Self {
            listener,
            pool: Arc::new(Semaphore::new(config.pool_size())),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// 持续接受连接，永不返回
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// 接受连接直到 `shutdown` 完成。已分派的连接会继续处理完毕。
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut id: u128 = 0;

        loop {
            let (stream, addr) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(a) => a,
                    Err(e) => {
                        error!("接受连接失败：{}，{}ms后重试", e, ACCEPT_ERROR_BACKOFF.as_millis());
                        tokio::select! {
                            _ = &mut shutdown => break,
                            _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => continue,
                        }
                    }
                },
            };
            debug!("[ID{}]新的连接：{}", id, addr);

            // 工作池饱和时，已接受的连接在这里等待空闲的工作者
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = Arc::clone(&self.pool).acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(e) => {
                        error!("工作池已关闭：{}", e);
                        break;
                    }
                },
            };

            let config = Arc::clone(&self.config);
            tokio::spawn(async move {
                handle_connection(stream, id, config).await;
                drop(permit);
            });
            id += 1;
        }
        info!("监听循环已退出");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_error_backoff_is_bounded() {
        assert!(ACCEPT_ERROR_BACKOFF > Duration::ZERO);
        assert!(ACCEPT_ERROR_BACKOFF <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let config = Config::new().with_port(0).with_local(true);
        let server = Server::bind(config).await.unwrap();
        assert!(server.local_addr().unwrap().ip().is_loopback());
        tokio::time::timeout(Duration::from_secs(5), server.run_until(async {}))
            .await
            .unwrap();
    }
}
