// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 简易 HTTP/1.1 服务器
//!
//! 接受 TCP 连接，读取一个请求，根据 `Accept` 头在 HTML 与 JSON 之间做内容协商，
//! 然后写出 `200 OK` 响应并关闭连接。
//!
//! 不接受命令行参数，也不读取环境变量；运行参数来自 `config/development.toml`。

use simple_webserver::{Config, Server};

use log::{error, info, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use tokio::runtime::Builder;

use std::process::ExitCode;

const LOG_CONFIG: &str = "config/log4rs.yaml";
const SERVER_CONFIG: &str = "config/development.toml";

fn main() -> ExitCode {
    // 1. 日志系统：优先使用 YAML 配置，缺失时退回控制台输出
    init_logging();

    // 2. 运行参数
    let config = Config::from_toml(SERVER_CONFIG);
    info!("配置文件已载入");

    // 3. 按配置的线程数构建运行时
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(r) => r,
        Err(e) => {
            error!("无法构建Tokio运行时：{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Tokio运行时已启动，工作线程数：{}", config.worker_threads());

    runtime.block_on(async move {
        let port = config.port();
        match Server::bind(config).await {
            Ok(server) => {
                server.run().await;
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("无法绑定端口：{}，错误：{}", port, e);
                ExitCode::FAILURE
            }
        }
    })
}

fn init_logging() {
    if log4rs::init_file(LOG_CONFIG, Default::default()).is_ok() {
        return;
    }

    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let fallback = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    match fallback {
        Ok(c) => {
            if let Err(e) = log4rs::init_config(c) {
                eprintln!("无法初始化日志系统：{}", e);
            }
        }
        Err(e) => eprintln!("无法构建默认日志配置：{}", e),
    }
    log::warn!("无法从{}载入日志配置，使用控制台输出", LOG_CONFIG);
}
