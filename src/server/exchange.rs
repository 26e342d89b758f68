//! Exchange
//!
//! The unit of work for one dynamic request: the parsed request, the
//! response-in-progress, an optional error, attached files and a property
//! bag for passing context within the request's lifetime. Created once per
//! dynamic request and owned by the connection that created it.

use std::collections::HashMap;

use hyper::body::Bytes;

use crate::server::error::HandlerError;
use crate::server::request::Request;
use crate::server::response::Response;

/// File attached to a request (e.g. an upload), kept in arrival order
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub content: Bytes,
}

#[derive(Debug)]
pub struct Exchange {
    pub req: Request,
    pub res: Response,
    pub err: Option<HandlerError>,
    pub attachments: Vec<Attachment>,
    properties: HashMap<String, serde_json::Value>,
}

impl Exchange {
    #[must_use]
    pub fn new(req: Request, res: Response) -> Self {
        Self {
            req,
            res,
            err: None,
            attachments: Vec::new(),
            properties: HashMap::new(),
        }
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.properties.insert(key.into(), value);
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}
