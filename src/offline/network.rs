// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;

use super::{Request, RequestMode, Response};
use crate::utils::http_client;

pub trait Network {
    /// Perform the request. `Err` means the network itself failed; any HTTP
    /// status, including errors, is a `Response`.
    fn fetch(&self, req: &Request) -> Result<Response>;
}

impl<N: Network + ?Sized> Network for &N {
    fn fetch(&self, req: &Request) -> Result<Response> {
        (**self).fetch(req)
    }
}

pub struct HttpNetwork {
    client: reqwest::blocking::Client,
}

impl HttpNetwork {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl Network for HttpNetwork {
    fn fetch(&self, req: &Request) -> Result<Response> {
        let method = Method::from_bytes(req.method.as_bytes())
            .with_context(|| format!("Invalid HTTP method '{}'", req.method))?;
        let mut builder = self.client.request(method, req.url.clone());
        if req.mode == RequestMode::Navigate {
            builder = builder.header(ACCEPT, "text/html,application/xhtml+xml");
        }
        let resp = builder
            .send()
            .with_context(|| format!("{} {}", req.method, req.url))?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .bytes()
            .with_context(|| format!("Read body of {}", req.url))?
            .to_vec();
        Ok(Response {
            status,
            content_type,
            body,
        })
    }
}
