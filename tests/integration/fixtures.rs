//! Shared configuration and page bodies for the mock site

use showcase_harvest::config::Config;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A configuration pointing at the mock server and writing into `out_dir`
pub fn test_config(base_url: &str, out_dir: &Path) -> Config {
    let mut config = Config::default();
    config.scraper.base_url = base_url.to_string();
    config.scraper.max_concurrency = 4;
    config.scraper.request_timeout_secs = 5;
    config.scraper.connect_timeout_secs = 2;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.showcase.event = "bangkok".to_string();
    config.showcase.total_pages = 2;
    config.output.directory = out_dir.display().to_string();
    config
}

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

pub fn listing_page(slugs: &[&str]) -> String {
    let mut body = String::from(r#"<nav><a href="/events">Events</a><a href="/">Home</a></nav>"#);
    for slug in slugs {
        body.push_str(&format!(r#"<div class="card"><a href="/showcase/{}">{}</a></div>"#, slug, slug));
    }
    body
}

pub fn project_page(name: &str, event_label: &str) -> String {
    format!(
        r#"<h1>{name}</h1>
           <p>{name} in one line.</p>
           <div><h3>Created At</h3><div><a href="/events/x">{event_label}</a></div></div>
           <div><h3>Winner of</h3><div><h4>Pool Prize</h4></div></div>
           <a href="https://{name}.example">Live Demo</a>
           <a href="https://github.com/example/{name}">Source Code</a>
           <h3>Project Description</h3>
           <p>About {name}.</p>
           <h3>How it's Made</h3>
           <p>Rust and Solidity.</p>
           <h2>More projects</h2>"#
    )
}

pub fn event_index_page() -> String {
    r#"<a href="/events/bangkok">Bangkok</a>
       <a href="/showcase?events=bangkok">Projects</a>
       <a href="/events/bangkok">Bangkok (again)</a>
       <a href="/events/online">Online</a>"#
        .to_string()
}

pub fn prize_page() -> String {
    r#"<div class="border-b-2 py-8">
         <h2>Uniswap Foundation</h2>
         <p class="text-2xl font-bold">$10,000</p>
         <div data-state="open" id="collapsible-data">
           <span class="text-xl font-semibold break-normal">🏆 Best Hook</span>
           <span class="text-xl font-medium">$10,000</span>
           <div class="group flex text-md"><span>Prize breakdown</span></div>
           <div class="text-lg mt-1.5 mb-2">Ship a hook.</div>
           <div class="flex flex-col lg:flex-row gap-y-2 gap-x-10">
             <div class="flex gap-x-1"><div class="flex flex-col">
               <div class="w-fit">1st place</div><div class="text-gray-900">$6,000</div>
             </div></div>
             <div class="flex gap-x-1"><div class="flex flex-col">
               <div class="w-fit">2nd place</div><div class="text-gray-900">$4,000</div>
             </div></div>
           </div>
         </div>
       </div>"#
        .to_string()
}

/// Mounts the whole mock site; `/showcase/beta` and the online prize page fail
pub async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/showcase"))
        .and(query_param("page", "1"))
        .respond_with(html(&listing_page(&["alpha", "beta"])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showcase"))
        .and(query_param("page", "2"))
        .respond_with(html(&listing_page(&["gamma", "alpha"])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showcase/alpha"))
        .respond_with(html(&project_page("alpha", "ETHGlobal Bangkok 2024")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showcase/beta"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/showcase/gamma"))
        .respond_with(html(&project_page("gamma", "ETHGlobal Online")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/hackathons"))
        .respond_with(html(&event_index_page()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/bangkok"))
        .respond_with(html("<p>Queen Sirikit Centre</p><p>November 12 - 15 2024</p>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/online"))
        .respond_with(html("<p>Join from anywhere</p>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/bangkok/prizes"))
        .respond_with(html(&prize_page()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/online/prizes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

/// Every data row of a written table, header excluded
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
