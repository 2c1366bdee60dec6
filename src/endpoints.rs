// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路由端点与分发模块
//!
//! 该模块实现了服务器的全部路由逻辑：
//! - **分发器** `dispatch`：按目标路径做有序的首个匹配，未命中时合成 404。
//! - **端点**：`/`（基础）、`/echo/`（回显，支持 gzip）、`/user-agent`、
//!   `/files/`（按配置的根目录读写文件）。
//!
//! 除 `/files/` 外的端点都是从请求到响应的纯函数。`/files/` 内部的文件系统
//! 错误会被降级为格式完整的 HTTP 错误响应，原始错误带上下文返回给分发器
//! 记录日志，连接本身照常收到响应。

use crate::{
    config::Config,
    exception::Exception,
    param::HttpEncoding,
    request::Request,
    response::Response,
};

use bytes::Bytes;
use flate2::{write::GzEncoder, Compression};
use log::{error, warn};

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

/// # 路由分发器
///
/// 按固定顺序对请求目标做首个匹配并调用对应端点。顺序本身是契约的一部分：
/// 当前的前缀互不重叠，但未来新增路由时必须保持先注册者先匹配。
///
/// 端点返回的错误在此处带上请求 ID 与路由上下文记录日志；已构建好的响应
/// （本身可能就是 404/500 等错误态）仍会原样返回给连接写出。
pub fn dispatch(request: &Request, id: u128, config: &Config) -> Response {
    let target = request.target();

    if target == "/" {
        base_endpoint(request)
    } else if target.starts_with("/echo/") {
        echo_endpoint(request, id)
    } else if target.starts_with("/user-agent") {
        user_agent_endpoint(request)
    } else if target.starts_with("/files/") {
        let (response, err) = files_endpoint(request, config.file_root(), id);
        if let Some(e) = err {
            error!("[ID{}]处理文件请求{}时出错: {}", id, target, e);
        }
        response
    } else {
        warn!("[ID{}]未匹配到路由：{}，返回404", id, target);
        Response::from_status_code(404, "Not Found")
    }
}

/// ## 基础端点 `/`
///
/// 返回 `200 OK`，无标头，空响应体。永远成功。
pub fn base_endpoint(_request: &Request) -> Response {
    Response::new()
}

/// ## 回显端点 `/echo/<s>`
///
/// 响应体为目标路径去掉 `/echo/` 前缀后的剩余部分。当请求的
/// `Accept-Encoding` 值中**包含** `gzip` 子串时（刻意的宽松匹配，不要求
/// 精确的记号），对响应体做 gzip 压缩并设置 `Content-Encoding: gzip`。
/// 两种情况下 `Content-Length` 都按最终响应体的字节长度填写。
pub fn echo_endpoint(request: &Request, id: u128) -> Response {
    let mut response = Response::new();
    let suffix = request
        .target()
        .strip_prefix("/echo/")
        .unwrap_or_default();
    let mut body = suffix.as_bytes().to_vec();

    if request.encoding().contains("gzip") {
        // 内存内压缩没有实际的失败路径；保险起见失败时退回未压缩内容
        match compress_gzip(&body) {
            Ok(compressed) => {
                body = compressed;
                response.set_content_encoding(HttpEncoding::Gzip);
            }
            Err(e) => {
                error!("[ID{}]压缩回显内容失败: {}，返回未压缩内容", id, e);
            }
        }
    }

    response
        .set_content_type("text/plain")
        .set_content_length(body.len())
        .set_body(Bytes::from(body));
    response
}

/// ## User-Agent 端点 `/user-agent`
///
/// 返回请求的 `User-Agent` 值。标头缺失时返回空字符串，不视为错误。
pub fn user_agent_endpoint(request: &Request) -> Response {
    let user_agent = request.user_agent();

    let mut response = Response::new();
    response
        .set_content_type("text/plain")
        .set_content_length(user_agent.len())
        .set_body(Bytes::copy_from_slice(user_agent.as_bytes()));
    response
}

/// ## 文件端点 `/files/<name>`
///
/// 文件名为目标路径去掉 `/files/` 前缀后的剩余部分，解析到配置的根目录下。
/// 含 `..` 段或以 `/` 开头的文件名会被直接拒绝（目录遍历防护）。
///
/// - `GET`：读取文件。成功返回 `200` 与原始字节；任何读取失败（不存在、
///   无权限等，不做区分）返回 `404`。
/// - `POST`：仅当请求的 `Content-Type` 包含 `application/octet-stream` 时
///   执行，否则返回 `400`。写入以 `0o666` 权限创建或截断文件，成功返回
///   `201` 并回显写入的字节，失败返回 `500`。
/// - 其他方法：返回 `405 Method Not Allowed`。
///
/// 并发说明：对同一文件的并发 GET/POST 在操作系统的写入粒度上存在竞争，
/// 这里不做任何加锁（接受的限制）。
pub fn files_endpoint(
    request: &Request,
    root: &str,
    id: u128,
) -> (Response, Option<Exception>) {
    let file_name = request
        .target()
        .strip_prefix("/files/")
        .unwrap_or_default();

    if !is_safe_file_name(file_name) {
        warn!("[ID{}]文件名{}包含越权路径，返回400", id, file_name);
        return (Response::from_status_code(400, "Invalid path"), None);
    }

    let path = Path::new(root).join(file_name);

    match request.method() {
        "GET" => match fs::read(&path) {
            Ok(file) => {
                let mut response = Response::new();
                response
                    .set_content_type("application/octet-stream")
                    .set_content_length(file.len())
                    .set_body(Bytes::from(file));
                (response, None)
            }
            Err(e) => (
                Response::from_status_code(404, "File not found"),
                Some(Exception::FileRead(e)),
            ),
        },
        "POST" => {
            if !request.content_type().contains("application/octet-stream") {
                return (
                    Response::from_status_code(400, "Invalid content type"),
                    None,
                );
            }
            match write_file(&path, request.body().as_bytes()) {
                Ok(_) => (
                    Response::from_status_code(201, request.body()),
                    None,
                ),
                Err(e) => (
                    Response::from_status_code(500, "Error Writing file"),
                    Some(Exception::FileWrite(e)),
                ),
            }
        }
        method => {
            warn!("[ID{}]文件端点不支持的方法：{}，返回405", id, method);
            (Response::from_status_code(405, "Method Not Allowed"), None)
        }
    }
}

/// 以 `0o666` 权限创建（或截断）文件并写入全部内容。
#[cfg(unix)]
fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o666)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

/// 目录遍历防护：拒绝绝对路径以及任何含 `..` 段的文件名。
fn is_safe_file_name(file_name: &str) -> bool {
    if file_name.starts_with('/') {
        return false;
    }
    !file_name.split('/').any(|segment| segment == "..")
}

/// 对数据做 gzip 压缩，返回压缩后的字节序列。
fn compress_gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
