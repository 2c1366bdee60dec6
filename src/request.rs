// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 该模块是服务器的核心组件之一，负责将 TCP 流中读取的原始字节码
//! 解析为强类型的 `Request` 结构体。它涵盖了：
//! 1. 请求行（Request-Line）的解析（方法、目标路径）。
//! 2. 固定集合的 HTTP 标头（Headers）的提取。
//! 3. 请求体（Body）的提取。
//!
//! ## 解析约定
//! - 标头匹配是**大小写敏感**的前缀匹配，只识别 `User-Agent`、`Accept`、
//!   `Accept-Encoding`、`Content-Type`、`Content-Length` 五个标头，其余行
//!   静默忽略。不做值修剪、大小写折叠或多行折叠。
//! - 请求方法不做合法性校验，保留为原始字符串。
//! - 请求体取 `\r\n` 切分后的**最后一行**，而不是按 Content-Length 精确
//!   读取。这是对上游实现的刻意保留，含 `\r\n` 的多行请求体会被截断。

use crate::{exception::Exception, param::CRLF};
use log::error;

/// 表示一个完整的 HTTP 请求。
///
/// 每个连接只产生一个实例，路由分发完成后即被丢弃。
/// 所有标头字段在对应标头缺失时保持为空字符串。
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP 请求方法（原始字符串，不校验）
    method: String,
    /// 请求的目标路径（含前导 `/`，不做解码）
    target: String,
    /// 客户端标识字符串
    user_agent: String,
    /// 客户端接受的内容类型（MIME）
    accept: String,
    /// 客户端声明的 `Accept-Encoding` 原始值
    encoding: String,
    /// 请求体的内容类型
    content_type: String,
    /// 请求体长度的原始字符串（不做数值解析）
    content_length: String,
    /// 请求体
    body: String,
}

impl Request {
    /// 从原始字节缓冲区尝试构建 `Request` 实例。
    ///
    /// # 逻辑步骤
    /// 1. 验证编码：确保请求数据是合法的 UTF-8 字符串。
    /// 2. 解析请求行：按单个空格切分，前两个记号作为方法与目标。
    /// 3. 迭代解析标头：对固定前缀集合做大小写敏感匹配。
    /// 4. 提取请求体：当 `Content-Length` 存在且不为字面值 `"0"` 时，
    ///    取切分序列的最后一行。
    ///
    /// # 参数
    /// * `buffer` - 从网络 Socket 读取的原始数据。
    /// * `id` - 全局请求 ID，用于在多任务环境下追踪日志。
    ///
    /// # 错误处理
    /// 行数不足两行、请求行记号不足两个或编码非法时返回相应的 `Exception`，
    /// 调用方应放弃该连接且不发送响应。
    pub fn try_from(buffer: &[u8], id: u128) -> Result<Self, Exception> {
        // 1. 将字节流转换为字符串，失败则判定为非法的 HTTP 请求
        let request_string = match std::str::from_utf8(buffer) {
            Ok(string) => string,
            Err(_) => {
                error!("[ID{}]无法以UTF-8解析HTTP请求", id);
                return Err(Exception::RequestNotUtf8);
            }
        };

        let request_lines: Vec<&str> = request_string.split(CRLF).collect();

        // 2. 解析请求行 (e.g., "GET /echo/abc HTTP/1.1")
        let first_line_parts: Vec<&str> = request_lines[0].split(' ').collect();

        if request_lines.len() < 2 || first_line_parts.len() < 2 {
            error!("[ID{}]HTTP请求格式不正确：{}", id, request_lines[0]);
            return Err(Exception::InvalidRequest);
        }

        let mut request = Self {
            method: first_line_parts[0].to_string(),
            target: first_line_parts[1].to_string(),
            ..Self::default()
        };

        // 3. 迭代各行解析 Headers（大小写敏感的固定前缀匹配）
        for line in &request_lines[1..] {
            if let Some(val) = line.strip_prefix("User-Agent: ") {
                request.user_agent = val.to_string();
            } else if let Some(val) = line.strip_prefix("Accept: ") {
                request.accept = val.to_string();
            } else if let Some(val) = line.strip_prefix("Accept-Encoding: ") {
                request.encoding = val.to_string();
            } else if let Some(val) = line.strip_prefix("Content-Type: ") {
                request.content_type = val.to_string();
            } else if let Some(val) = line.strip_prefix("Content-Length: ") {
                request.content_length = val.to_string();
            }
        }

        // 4. 提取请求体：取切分后的最后一行，而非按长度读取
        if !request.content_length.is_empty() && request.content_length != "0" {
            if let Some(last) = request_lines.last() {
                request.body = last.to_string();
            }
        }

        Ok(request)
    }
}

// --- Getter 访问器实现 ---

impl Request {
    /// 获取请求方法（原始字符串）
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 获取请求的目标路径
    pub fn target(&self) -> &str {
        &self.target
    }

    /// 获取用户代理字符串
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// 获取客户端接受的内容类型
    pub fn accept(&self) -> &str {
        &self.accept
    }

    /// 获取客户端声明的 `Accept-Encoding` 原始值
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// 获取请求体的内容类型
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// 获取 `Content-Length` 的原始字符串值
    pub fn content_length(&self) -> &str {
        &self.content_length
    }

    /// 获取请求体
    pub fn body(&self) -> &str {
        &self.body
    }
}
