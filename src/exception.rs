// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了服务器在请求处理生命周期中可能抛出的各类异常情况。
//!
//! ## 设计意图
//! - **错误分类**：涵盖协议解析错误与文件系统读写错误两大类。
//! - **语义映射**：解析类错误导致连接被直接放弃（不发送响应）；文件类错误
//!   会被降级为一个格式完整的 HTTP 错误响应，同时原始错误带上下文上报给
//!   分发器记录日志。
//! - **用户友好**：通过实现 `std::fmt::Display`，确保错误信息可以被安全地
//!   记录到日志中。

use std::fmt;
use std::io;

/// 服务器处理请求过程中发生的异常类型。
///
/// 该枚举通常作为 `Result` 的 `Err` 部分返回，用于指示处理失败的具体原因。
#[derive(Debug)]
pub enum Exception {
    /// 客户端发送的请求字节流无法解析为合法的 UTF-8 字符串。
    /// 这通常发生在请求头或正文包含非法字符时。
    RequestNotUtf8,
    /// 请求报文格式非法：行数不足，或请求行无法拆出方法与目标两个记号。
    InvalidRequest,
    /// `/files/` 端点读取文件失败（不存在、无权限等，不做区分）。
    /// 在 Web 语义中对应 `404 Not Found`。
    FileRead(io::Error),
    /// `/files/` 端点写入文件失败。对应 `500 Internal Server Error`。
    FileWrite(io::Error),
}

use Exception::*;

/// 为 `Exception` 实现 `Display` 特性，使其支持字符串格式化输出。
///
/// 这些描述信息主要用于系统日志（Logging）。
impl fmt::Display for Exception {
    /// 根据错误类型写入人类可读的描述文本。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestNotUtf8 => write!(f, "Request bytes can't be parsed in UTF-8"),
            InvalidRequest => write!(f, "Invalid request"),
            FileRead(e) => write!(f, "error reading file: {}", e),
            FileWrite(e) => write!(f, "error writing file: {}", e),
        }
    }
}
