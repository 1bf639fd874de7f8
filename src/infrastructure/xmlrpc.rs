//! Minimal XML-RPC encoding and response parsing
//!
//! Covers the subset WordPress speaks: scalars, `dateTime.iso8601`,
//! arrays, structs, and `<nil/>`. Requests are rendered as strings;
//! responses are tokenised with a regex and read by a small recursive
//! descent parser.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

const ISO8601_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// An XML-RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum XmlRpcValue {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(NaiveDateTime),
    Base64(String),
    Array(Vec<XmlRpcValue>),
    /// Struct members in insertion order
    Struct(Vec<(String, XmlRpcValue)>),
    Nil,
}

impl XmlRpcValue {
    /// Build a struct from `(name, value)` pairs
    pub fn structure<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, XmlRpcValue)>,
        K: Into<String>,
    {
        XmlRpcValue::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn string(s: impl Into<String>) -> Self {
        XmlRpcValue::String(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmlRpcValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[XmlRpcValue]> {
        match self {
            XmlRpcValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a struct member by name
    pub fn member(&self, name: &str) -> Option<&XmlRpcValue> {
        match self {
            XmlRpcValue::Struct(members) => members
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Render the value for display, e.g. an id returned as int or string
    pub fn to_display_string(&self) -> String {
        match self {
            XmlRpcValue::Int(i) => i.to_string(),
            XmlRpcValue::String(s) | XmlRpcValue::Base64(s) => s.clone(),
            XmlRpcValue::Bool(b) => b.to_string(),
            XmlRpcValue::Double(d) => d.to_string(),
            XmlRpcValue::DateTime(dt) => dt.format(ISO8601_FORMAT).to_string(),
            XmlRpcValue::Nil => String::new(),
            XmlRpcValue::Array(_) | XmlRpcValue::Struct(_) => format!("{:?}", self),
        }
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<value>");
        match self {
            XmlRpcValue::Int(i) => out.push_str(&format!("<int>{}</int>", i)),
            XmlRpcValue::Bool(b) => {
                out.push_str(if *b {
                    "<boolean>1</boolean>"
                } else {
                    "<boolean>0</boolean>"
                })
            }
            XmlRpcValue::String(s) => {
                out.push_str("<string>");
                out.push_str(&escape(s));
                out.push_str("</string>");
            }
            XmlRpcValue::Double(d) => out.push_str(&format!("<double>{}</double>", d)),
            XmlRpcValue::DateTime(dt) => out.push_str(&format!(
                "<dateTime.iso8601>{}</dateTime.iso8601>",
                dt.format(ISO8601_FORMAT)
            )),
            XmlRpcValue::Base64(s) => out.push_str(&format!("<base64>{}</base64>", s)),
            XmlRpcValue::Array(items) => {
                out.push_str("<array><data>");
                for item in items {
                    item.write_xml(out);
                }
                out.push_str("</data></array>");
            }
            XmlRpcValue::Struct(members) => {
                out.push_str("<struct>");
                for (name, value) in members {
                    out.push_str("<member><name>");
                    out.push_str(&escape(name));
                    out.push_str("</name>");
                    value.write_xml(out);
                    out.push_str("</member>");
                }
                out.push_str("</struct>");
            }
            XmlRpcValue::Nil => out.push_str("<nil/>"),
        }
        out.push_str("</value>");
    }
}

/// Render a `<methodCall>` document
pub fn method_call(method: &str, params: &[XmlRpcValue]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<methodCall><methodName>");
    out.push_str(&escape(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        param.write_xml(&mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>\n");
    out
}

/// A decoded `<methodResponse>`
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(XmlRpcValue),
    Fault { code: i64, message: String },
}

/// Parse a `<methodResponse>` document
pub fn parse_response(xml: &str) -> Result<MethodResponse, String> {
    let mut parser = Parser::new(xml);

    parser.expect_open("methodResponse")?;
    match parser.next_significant() {
        Some(Token::Open(name)) if name == "params" => {
            parser.expect_open("param")?;
            let value = parser.parse_value()?;
            Ok(MethodResponse::Success(value))
        }
        Some(Token::Open(name)) if name == "fault" => {
            let value = parser.parse_value()?;
            let code = match value.member("faultCode") {
                Some(XmlRpcValue::Int(code)) => *code,
                _ => 0,
            };
            let message = value
                .member("faultString")
                .map(XmlRpcValue::to_display_string)
                .unwrap_or_default();
            Ok(MethodResponse::Fault { code, message })
        }
        other => Err(format!("expected <params> or <fault>, found {:?}", other)),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn entity_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|[a-z]+);").unwrap())
}

fn unescape(s: &str) -> String {
    entity_regex()
        .replace_all(s, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity.strip_prefix('#').and_then(|dec| dec.parse().ok())
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open(String),
    Close(String),
    Empty(String),
    Text(String),
}

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"<\?[^>]*\?>|<!--.*?-->|<(/?)([A-Za-z0-9_.:-]+)[^>]*?(/?)>|([^<]+)").unwrap()
    })
}

fn tokenize(xml: &str) -> Vec<Token> {
    token_regex()
        .captures_iter(xml)
        .filter_map(|caps| {
            if let Some(text) = caps.get(4) {
                return Some(Token::Text(unescape(text.as_str())));
            }
            let name = caps.get(2)?.as_str().to_string();
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let empty = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            Some(if closing {
                Token::Close(name)
            } else if empty {
                Token::Empty(name)
            } else {
                Token::Open(name)
            })
        })
        .collect()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(xml: &str) -> Self {
        Parser {
            tokens: tokenize(xml),
            pos: 0,
        }
    }

    fn peek_raw(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next_raw(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_raw(), Some(Token::Text(text)) if text.trim().is_empty()) {
            self.pos += 1;
        }
    }

    fn peek_significant(&mut self) -> Option<&Token> {
        self.skip_whitespace();
        self.peek_raw()
    }

    fn next_significant(&mut self) -> Option<Token> {
        self.skip_whitespace();
        self.next_raw()
    }

    fn expect_open(&mut self, name: &str) -> Result<(), String> {
        match self.next_significant() {
            Some(Token::Open(ref found)) if found == name => Ok(()),
            other => Err(format!("expected <{}>, found {:?}", name, other)),
        }
    }

    fn expect_close(&mut self, name: &str) -> Result<(), String> {
        match self.next_significant() {
            Some(Token::Close(ref found)) if found == name => Ok(()),
            other => Err(format!("expected </{}>, found {:?}", name, other)),
        }
    }

    /// Text up to the closing tag, which is consumed
    fn text_until_close(&mut self, name: &str) -> Result<String, String> {
        let text = match self.peek_raw().cloned() {
            Some(Token::Text(text)) => {
                self.pos += 1;
                text
            }
            _ => String::new(),
        };
        self.expect_close(name)?;
        Ok(text)
    }

    fn parse_value(&mut self) -> Result<XmlRpcValue, String> {
        match self.next_significant() {
            Some(Token::Open(name)) if name == "value" => {}
            Some(Token::Empty(name)) if name == "value" => {
                return Ok(XmlRpcValue::String(String::new()))
            }
            other => return Err(format!("expected <value>, found {:?}", other)),
        }

        // Untyped content is a string
        if let (Some(Token::Text(text)), Some(Token::Close(close))) =
            (self.tokens.get(self.pos), self.tokens.get(self.pos + 1))
        {
            if close == "value" {
                let text = text.clone();
                self.pos += 2;
                return Ok(XmlRpcValue::String(text));
            }
        }

        let value = match self.next_significant() {
            Some(Token::Close(name)) if name == "value" => {
                return Ok(XmlRpcValue::String(String::new()))
            }
            Some(Token::Empty(name)) => match name.as_str() {
                "nil" => XmlRpcValue::Nil,
                "string" => XmlRpcValue::String(String::new()),
                "base64" => XmlRpcValue::Base64(String::new()),
                "array" => XmlRpcValue::Array(Vec::new()),
                "struct" => XmlRpcValue::Struct(Vec::new()),
                other => return Err(format!("unexpected empty <{}/>", other)),
            },
            Some(Token::Open(name)) => self.parse_typed(&name)?,
            other => return Err(format!("expected value type, found {:?}", other)),
        };

        self.expect_close("value")?;
        Ok(value)
    }

    fn parse_typed(&mut self, name: &str) -> Result<XmlRpcValue, String> {
        match name {
            "string" => Ok(XmlRpcValue::String(self.text_until_close(name)?)),
            "int" | "i4" | "i8" => {
                let text = self.text_until_close(name)?;
                text.trim()
                    .parse()
                    .map(XmlRpcValue::Int)
                    .map_err(|e| format!("invalid <{}> '{}': {}", name, text, e))
            }
            "boolean" => match self.text_until_close(name)?.trim() {
                "1" => Ok(XmlRpcValue::Bool(true)),
                "0" => Ok(XmlRpcValue::Bool(false)),
                other => Err(format!("invalid <boolean> '{}'", other)),
            },
            "double" => {
                let text = self.text_until_close(name)?;
                text.trim()
                    .parse()
                    .map(XmlRpcValue::Double)
                    .map_err(|e| format!("invalid <double> '{}': {}", text, e))
            }
            "dateTime.iso8601" => {
                let text = self.text_until_close(name)?;
                let trimmed = text.trim();
                NaiveDateTime::parse_from_str(trimmed, ISO8601_FORMAT)
                    .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
                    .map(XmlRpcValue::DateTime)
                    .map_err(|e| format!("invalid <dateTime.iso8601> '{}': {}", text, e))
            }
            "base64" => Ok(XmlRpcValue::Base64(
                self.text_until_close(name)?.trim().to_string(),
            )),
            "nil" => {
                self.expect_close(name)?;
                Ok(XmlRpcValue::Nil)
            }
            "array" => self.parse_array(),
            "struct" => self.parse_struct(),
            other => Err(format!("unsupported value type <{}>", other)),
        }
    }

    fn parse_array(&mut self) -> Result<XmlRpcValue, String> {
        let mut items = Vec::new();
        match self.next_significant() {
            Some(Token::Empty(name)) if name == "data" => {}
            Some(Token::Open(name)) if name == "data" => loop {
                let at_end =
                    matches!(self.peek_significant(), Some(Token::Close(name)) if name == "data");
                if at_end {
                    self.pos += 1;
                    break;
                }
                items.push(self.parse_value()?);
            },
            other => return Err(format!("expected <data>, found {:?}", other)),
        }
        self.expect_close("array")?;
        Ok(XmlRpcValue::Array(items))
    }

    fn parse_struct(&mut self) -> Result<XmlRpcValue, String> {
        let mut members = Vec::new();
        loop {
            match self.next_significant() {
                Some(Token::Close(name)) if name == "struct" => break,
                Some(Token::Open(name)) if name == "member" => {
                    self.expect_open("name")?;
                    let key = self.text_until_close("name")?;
                    let value = self.parse_value()?;
                    self.expect_close("member")?;
                    members.push((key, value));
                }
                other => return Err(format!("expected <member>, found {:?}", other)),
            }
        }
        Ok(XmlRpcValue::Struct(members))
    }
}
