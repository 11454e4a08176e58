//! Page Fetcher (§4.2): a single GET with an explicit redirect-hop count.
//!
//! The shared client disables automatic redirect handling
//! (`Policy::none()`) so that each hop can be counted; both fetch paths
//! implement their own bounded manual redirect loop.

use rquest::Client;
use std::time::Instant;

const MAX_REDIRECT_HOPS: u32 = 20;

pub struct FetchOutcome {
    pub status: u16,
    pub final_url: String,
    pub ttfb_ms: u64,
    pub redirect_hops: u32,
    pub body: String,
    pub content_type: String,
}

/// `GET(url, timeout)` per §4.2. Redirects are followed manually so
/// `redirect_hops` is exact; on network/parse failure returns
/// `Err("<ErrorKind>: <message>")`.
pub async fn get(client: &Client, url: &str) -> Result<FetchOutcome, String> {
    let started = Instant::now();
    let mut current = url.to_string();
    let mut hops = 0u32;

    loop {
        let response = client
            .get(&current)
            .send()
            .await
            .map_err(|e| format!("RequestError: {e}"))?;

        let status = response.status().as_u16();
        if (300..400).contains(&status) && hops < MAX_REDIRECT_HOPS {
            if let Some(location) = response
                .headers()
                .get(rquest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                if let Ok(next) = url::Url::parse(&current).and_then(|base| base.join(location)) {
                    current = next.to_string();
                    hops += 1;
                    continue;
                }
            }
        }

        let content_type = response
            .headers()
            .get(rquest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| format!("DecodeError: {e}"))?;

        return Ok(FetchOutcome {
            status,
            final_url,
            ttfb_ms: started.elapsed().as_millis() as u64,
            redirect_hops: hops,
            body,
            content_type,
        });
    }
}

/// Internal-link verification per §4.5 phase 2: HEAD with manual redirect
/// follow; on 405/501, retry with GET; on any error, status 0.
pub async fn check_link(client: &Client, url: &str) -> u16 {
    match head_following_redirects(client, url).await {
        Ok(status) if status == 405 || status == 501 => get(client, url).await.map(|o| o.status).unwrap_or(0),
        Ok(status) => status,
        Err(_) => 0,
    }
}

async fn head_following_redirects(client: &Client, url: &str) -> Result<u16, String> {
    let mut current = url.to_string();
    let mut hops = 0u32;
    loop {
        let response = client
            .head(&current)
            .send()
            .await
            .map_err(|e| format!("RequestError: {e}"))?;
        let status = response.status().as_u16();
        if (300..400).contains(&status) && hops < MAX_REDIRECT_HOPS {
            if let Some(location) = response
                .headers()
                .get(rquest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                if let Ok(next) = url::Url::parse(&current).and_then(|base| base.join(location)) {
                    current = next.to_string();
                    hops += 1;
                    continue;
                }
            }
        }
        return Ok(status);
    }
}
