//! # HTTP 响应报文构建模块
//!
//! 负责将结构化的 `Response` 对象序列化为可直接写入 Socket 的字节序列。
//!
//! ## 序列化约定
//! 字段顺序是固定的：状态行、`Content-Encoding`、`Content-Type`、
//! `Content-Length`（均只在存在时输出）、空行分隔符、响应体、结尾 `\r\n`。
//! `Content-Length` **不做自动计算**：由各端点负责填入与响应体字节长度
//! 一致的值（对 gzip 压缩路径尤为关键，长度按字节而非字符计）。

use crate::param::{HttpEncoding, HttpVersion, CRLF, STATUS_CODES};

use bytes::Bytes;
use log::error;

/// 表示一个待序列化的 HTTP 响应。
///
/// 由端点构建，分发器持有至写入 Socket 为止，之后即被丢弃。
#[derive(Debug, Clone)]
pub struct Response {
    version: HttpVersion,
    status_code: u16,
    information: String,
    content_encoding: Option<HttpEncoding>,
    content_type: Option<String>,
    content_length: Option<String>,
    body: Bytes,
}

impl Response {
    /// 构造一个 `200 OK`、无标头、空响应体的响应。
    pub fn new() -> Self {
        Self {
            version: HttpVersion::V1_1,
            status_code: 200,
            information: "OK".to_string(),
            content_encoding: None,
            content_type: None,
            content_length: None,
            body: Bytes::new(),
        }
    }

    /// 构造一个只含状态行和响应体、不带任何内容标头的响应。
    ///
    /// 用于 404/400/405/500 等简短的诊断响应。
    pub fn from_status_code(code: u16, body: &str) -> Self {
        let mut response = Self::new();
        response.set_code(code);
        response.body = Bytes::copy_from_slice(body.as_bytes());
        response
    }

    /// 设置状态码并同步更新原因短语。
    ///
    /// 状态码必须存在于 `STATUS_CODES` 表中，否则视为编码错误直接 panic。
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self.information = match STATUS_CODES.get(&code) {
            Some(&information) => information.to_string(),
            None => {
                error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
                panic!("非法的状态码：{}", code);
            }
        };
        self
    }

    /// 设置 `Content-Encoding` 标头
    pub fn set_content_encoding(&mut self, encoding: HttpEncoding) -> &mut Self {
        self.content_encoding = Some(encoding);
        self
    }

    /// 设置 `Content-Type` 标头
    pub fn set_content_type(&mut self, content_type: &str) -> &mut Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// 设置 `Content-Length` 标头。调用方必须保证该值与响应体字节长度一致。
    pub fn set_content_length(&mut self, length: usize) -> &mut Self {
        self.content_length = Some(length.to_string());
        self
    }

    /// 设置响应体（原始字节，可能是 gzip 压缩产物）
    pub fn set_body(&mut self, body: Bytes) -> &mut Self {
        self.body = body;
        self
    }

    /// 将响应序列化为待写入 Socket 的字节序列。
    pub fn as_bytes(&self) -> Vec<u8> {
        let version = self.version.to_string();
        let status_code = self.status_code.to_string();

        let header = [
            version.as_str(),
            " ",
            &status_code,
            " ",
            &self.information,
            CRLF,
            match self.content_encoding {
                Some(e) => ["Content-Encoding: ", &e.to_string(), CRLF].concat(),
                None => "".to_string(),
            }
            .as_str(),
            match &self.content_type {
                Some(t) => ["Content-Type: ", t, CRLF].concat(),
                None => "".to_string(),
            }
            .as_str(),
            match &self.content_length {
                Some(l) => ["Content-Length: ", l, CRLF].concat(),
                None => "".to_string(),
            }
            .as_str(),
            CRLF,
        ]
        .concat();

        [header.as_bytes(), &self.body, CRLF.as_bytes()].concat()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// 获取状态码
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// 获取原因短语
    pub fn information(&self) -> &str {
        &self.information
    }

    /// 获取响应体
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// 获取 `Content-Length` 标头的值（若存在）
    pub fn content_length(&self) -> Option<&str> {
        self.content_length.as_deref()
    }

    /// 获取 `Content-Type` 标头的值（若存在）
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// 获取 `Content-Encoding` 标头的值（若存在）
    pub fn content_encoding(&self) -> Option<HttpEncoding> {
        self.content_encoding
    }
}
