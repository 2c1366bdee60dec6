// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 异步 HTTP/1.1 服务器
//!
//! 该程序实现了基于 Tokio 运行时的最小 HTTP/1.1 服务器。
//! 核心功能包括：
//! - 每连接一个轻量级任务的并发模型（监听循环本身单线程，只负责 accept）
//! - 单次读取、单次响应：不支持 keep-alive、流水线或分块传输
//! - 固定路由集合：`/`、`/echo/`、`/user-agent`、`/files/`
//! - 从连接建立起 5 秒的读写截止时间
//!
//! 每个连接的生命周期：读取（最多 1024 字节）→ 解析 → 分发 → 写出响应 →
//! 关闭。解析失败时放弃连接且不发送响应；单个连接的任何失败都不影响
//! 监听循环和其他连接。

use miniserver::config::Config;
use miniserver::endpoints::dispatch;
use miniserver::param::{CONNECTION_DEADLINE_SECS, READ_BUFFER_SIZE};
use miniserver::request::Request;

use log::{debug, error, info, warn};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    time::{timeout_at, Duration, Instant},
};

use std::{net::{Ipv4Addr, SocketAddrV4}, path::Path, sync::Arc};

/// # 程序入口点
///
/// 初始化日志系统、加载配置并启动主事件循环。
#[tokio::main]
async fn main() {
    // 1. 初始化日志系统：采用 log4rs 异步日志架构，通过外部 YAML 灵活配置级别与输出目的地
    log4rs::init_file("config/log4rs.yaml", Default::default()).unwrap();

    // 2. 环境配置加载：从 TOML 文件读取运行参数
    let config = Config::from_toml("config/development.toml");
    info!("配置文件已载入");
    info!("file root: {}", config.file_root());
    if !Path::new(config.file_root()).is_dir() {
        warn!(
            "文件根目录{}不存在，/files/端点的读取将全部返回404",
            config.file_root()
        );
    }

    // 3. 网络层初始化：
    // 支持全地址监听 (0.0.0.0) 或本地回环监听 (127.0.0.1)
    let port: u16 = config.port();
    info!("服务端将在{}端口上监听Socket连接", port);
    let address = match config.local() {
        true => Ipv4Addr::new(127, 0, 0, 1),
        false => Ipv4Addr::new(0, 0, 0, 0),
    };
    info!("服务端将在{}地址上监听Socket连接", address);
    let socket = SocketAddrV4::new(address, port);

    // 绑定端口并启动监听器
    let listener = match TcpListener::bind(socket).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("无法绑定端口：{}，错误：{}", port, e);
            panic!("无法绑定端口：{}，错误：{}", port, e);
        }
    };
    info!("端口{}绑定完成", port);

    let config_arc = Arc::new(config);
    let mut id: u128 = 0;

    // 4. 主事件循环 (Accept Loop)
    // 持续接收新连接并将其分发至 Tokio 线程池进行异步处理。
    // accept 失败只影响当次，循环继续。
    loop {
        let (mut stream, addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                error!("接受连接时出错：{}", e);
                continue;
            }
        };
        debug!("[ID{}]新的连接：{}", id, addr);

        let config_arc_clone = Arc::clone(&config_arc);

        // 使用轻量级绿色线程处理具体请求，确保非阻塞 IO
        tokio::spawn(async move {
            handle_connection(&mut stream, id, config_arc_clone).await;
        });
        id += 1; // 增加请求唯一标识序列
    }
}

/// # 连接处理器
///
/// 负责单个 TCP 流的生命周期：在从连接建立起计算的统一截止时间内，
/// 完成一次读取、解析、分发与一次响应写出，随后关闭连接。
async fn handle_connection(stream: &mut TcpStream, id: u128, config: Arc<Config>) {
    // 读写共用的截止时间，从连接建立时刻起计算
    let deadline = Instant::now() + Duration::from_secs(CONNECTION_DEADLINE_SECS);

    // 单次读取，超过缓冲区长度的请求被静默截断
    let mut buffer = vec![0; READ_BUFFER_SIZE];
    let n = match timeout_at(deadline, stream.read(&mut buffer)).await {
        Ok(Ok(0)) => {
            debug!("[ID{}]客户端在发送数据前关闭了连接", id);
            return;
        }
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            error!("[ID{}]读取TCPStream时遇到错误: {}", id, e);
            return;
        }
        Err(_) => {
            warn!("[ID{}]读取超时，放弃连接", id);
            return;
        }
    };
    debug!("[ID{}]HTTP请求接收完毕，共{}字节", id, n);

    // 1. 协议解析阶段：将字节流转换为结构化的 Request 对象。
    // 解析失败时直接放弃连接，不发送响应。
    let request = match Request::try_from(&buffer[..n], id) {
        Ok(req) => req,
        Err(e) => {
            error!("[ID{}]解析HTTP请求失败: {}", id, e);
            return;
        }
    };
    debug!("[ID{}]成功解析HTTP请求", id);

    // 2. 路由分发阶段：选择端点并构建 Response 对象
    let response = dispatch(&request, id, &config);

    // 3. 结构化日志记录：便于后期审计与性能监控
    info!(
        "[ID{}] {}, {}, {}, {}, {}",
        id,
        request.method(),
        request.target(),
        response.status_code(),
        response.information(),
        request.user_agent(),
    );

    // 4. 数据发送阶段：单次写出完整响应后关闭连接
    let response_bytes = response.as_bytes();
    match timeout_at(deadline, stream.write_all(&response_bytes)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("[ID{}]写出响应失败: {}", id, e);
            return;
        }
        Err(_) => {
            warn!("[ID{}]写出超时，放弃连接", id);
            return;
        }
    }
    let _ = stream.flush().await;
    debug!("[ID{}]响应发送完毕，长度: {}", id, response_bytes.len());
}
