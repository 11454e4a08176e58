//! Robots/Sitemap Probe (§4.4): one-shot fetch of `/robots.txt` and
//! `/sitemap.xml`, compiling an RFC 9309 matcher via `texting_robots`.

use crate::domain::RobotsInfo;
use crate::http_client::USER_AGENT;
use rquest::Client;
use texting_robots::Robot;

pub struct RobotsProbe {
    pub info: RobotsInfo,
    robot: Option<Robot>,
}

impl RobotsProbe {
    pub async fn fetch(client: &Client, start_url: &str) -> Self {
        let parsed = url::Url::parse(start_url).expect("start_url already validated");
        let origin = format!("{}://{}", parsed.scheme(), parsed.host_str().unwrap_or(""));
        let robots_url = format!("{origin}/robots.txt");
        let sitemap_url = format!("{origin}/sitemap.xml");

        let mut robots_present = false;
        let mut robots_status = None;
        let mut robots_text = String::new();
        let mut robot = None;

        if let Ok(response) = client.get(&robots_url).send().await {
            robots_status = Some(response.status().as_u16());
            if let Ok(text) = response.text().await {
                robots_text = text;
            }
            if robots_status == Some(200) {
                robots_present = true;
                robot = Robot::new(USER_AGENT, robots_text.as_bytes()).ok();
            }
        }

        let mut sitemap_present = robots_text.to_lowercase().contains("sitemap:");
        if !sitemap_present {
            if let Ok(response) = client.get(&sitemap_url).send().await {
                sitemap_present = response.status().as_u16() == 200;
            }
        }

        Self {
            info: RobotsInfo {
                robots_url,
                robots_present,
                robots_status,
                sitemap_url,
                sitemap_present,
            },
            robot,
        }
    }

    /// `true` unless a parsed robots.txt explicitly disallows `url` for our
    /// user agent. A missing or unparseable robots.txt never blocks a fetch.
    pub fn allowed(&self, url: &str) -> bool {
        match &self.robot {
            Some(robot) => robot.allowed(url),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_robots_allows_everything() {
        let mut server = mockito::Server::new_async().await;
        let _m = server.mock("GET", "/robots.txt").with_status(404).create_async().await;
        let _s = server.mock("GET", "/sitemap.xml").with_status(404).create_async().await;
        let client = crate::http_client::create_client(std::time::Duration::from_secs(5)).unwrap();
        let probe = RobotsProbe::fetch(&client, &format!("{}/", server.url())).await;
        assert!(!probe.info.robots_present);
        assert!(!probe.info.sitemap_present);
        assert!(probe.allowed(&format!("{}/anything", server.url())));
    }

    #[tokio::test]
    async fn sitemap_referenced_from_robots_counts_as_present() {
        let mut server = mockito::Server::new_async().await;
        let body = format!("Sitemap: {}/sitemap.xml\nUser-agent: *\nDisallow: /private", server.url());
        let _m = server.mock("GET", "/robots.txt").with_status(200).with_body(body).create_async().await;
        let client = crate::http_client::create_client(std::time::Duration::from_secs(5)).unwrap();
        let probe = RobotsProbe::fetch(&client, &format!("{}/", server.url())).await;
        assert!(probe.info.robots_present);
        assert!(probe.info.sitemap_present);
        assert!(!probe.allowed(&format!("{}/private/page", server.url())));
    }
}
