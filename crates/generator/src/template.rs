use crate::ads::ad_container;
use jobspot_core::{Article, JobPosting, SiteConfig, format_display_date};

/// Characters shown in an article teaser on the listing page
pub const EXCERPT_CHARS: usize = 150;

/// Escape store text for element content and double- or single-quoted
/// attributes
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Only http(s) and site-relative links may land in an `href`/`src`
fn safe_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/') {
        html_escape(url)
    } else {
        "#".to_string()
    }
}

/// Wrap page content in the shared document shell: head, navbar, the main
/// column and the sidebar ad.
pub fn layout(site: &SiteConfig, title: &str, description: &str, content: &str) -> String {
    let site_name = html_escape(&site.site_name);
    let ads_script = crate::ads::ads_script(&site.ads).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
    <link rel="icon" href="/favicon.ico">
    {ads_script}
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            color: #1f2937;
            background: #f3f4f6;
        }}
        nav {{ background: white; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }}
        nav .inner {{ max-width: 1200px; margin: 0 auto; padding: 1rem; display: flex; gap: 1.5rem; align-items: center; }}
        nav .brand {{ font-weight: 700; font-size: 1.25rem; color: #1d4ed8; margin-right: auto; }}
        nav a {{ color: #374151; text-decoration: none; }}
        main {{ max-width: 1200px; margin: 0 auto; padding: 2rem 1rem; display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }}
        h1 {{ font-size: 1.875rem; margin-bottom: 1rem; }}
        .stack > * + * {{ margin-top: 1rem; }}
        .card {{ display: block; background: white; padding: 1.5rem; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.08); color: inherit; text-decoration: none; }}
        .card h2, .card h3 {{ font-size: 1.25rem; }}
        .muted {{ color: #6b7280; font-size: 0.9rem; }}
        .tags {{ margin-top: 0.75rem; display: flex; flex-wrap: wrap; gap: 0.5rem; }}
        .tag {{ background: #dbeafe; color: #1e40af; font-size: 0.75rem; font-weight: 600; padding: 0.1rem 0.6rem; border-radius: 999px; }}
        .prose {{ margin-top: 1.5rem; }}
        .prose ul {{ margin: 0.5rem 0 0.5rem 1.5rem; }}
        .button {{ display: inline-block; background: #2563eb; color: white; padding: 0.75rem 1.5rem; border-radius: 6px; text-decoration: none; }}
        .ad-container {{ position: sticky; top: 6rem; min-height: 280px; padding: 1rem; border: 2px dashed #d1d5db; background: #f9fafb; display: flex; align-items: center; justify-content: center; }}
        .ad-placeholder {{ color: #9ca3af; font-size: 0.875rem; }}
        .hero-image {{ width: 100%; height: auto; border-radius: 8px; margin: 1rem 0; }}
        @media (max-width: 900px) {{
            main {{ grid-template-columns: 1fr; }}
        }}
    </style>
</head>
<body>
    <nav>
        <div class="inner">
            <a class="brand" href="/">{site_name}</a>
            <a href="/">Jobs</a>
            <a href="/articles">Articles</a>
        </div>
    </nav>
    <main>
        <div class="content">
            {content}
        </div>
        <aside>
            {ad}
        </aside>
    </main>
</body>
</html>"#,
        title = html_escape(title),
        description = html_escape(description),
        ads_script = ads_script,
        site_name = site_name,
        content = content,
        ad = ad_container(&site.ads),
    )
}

/// Summary card linking to a job's detail page
pub fn job_card(job: &JobPosting) -> String {
    let tags: String = job
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, html_escape(tag)))
        .collect();

    let salary = job
        .salary_range
        .as_deref()
        .map(|s| format!(r#"<span class="tag">{}</span>"#, html_escape(s)))
        .unwrap_or_default();

    format!(
        r#"<a class="card" href="{href}">
                <h3>{title}</h3>
                <p>{company}</p>
                <p class="muted">{location}</p>
                <div class="tags">{tags}{salary}</div>
            </a>"#,
        href = html_escape(&job.path()),
        title = html_escape(&job.title),
        company = html_escape(&job.company),
        location = html_escape(&job.location),
        tags = tags,
        salary = salary,
    )
}

/// Home page: newest jobs first, or an empty-state message
pub fn job_listing(site: &SiteConfig, jobs: &[JobPosting]) -> String {
    let body = if jobs.is_empty() {
        r#"<p class="muted">No jobs posted yet. Check back soon!</p>"#.to_string()
    } else {
        let cards: String = jobs.iter().map(job_card).collect();
        format!(r#"<div class="stack">{}</div>"#, cards)
    };

    layout(
        site,
        &format!("Latest AI Jobs | {}", site.site_name),
        "Browse the latest AI, Machine Learning, and Data Science jobs from top companies around the world.",
        &format!("<h1>Latest AI Jobs</h1>\n{}", body),
    )
}

/// Job detail page. The description is trusted markup from the store.
pub fn job_detail(site: &SiteConfig, job: &JobPosting) -> String {
    let salary = job
        .salary_range
        .as_deref()
        .map(|s| format!(r#"<p class="muted">Salary: {}</p>"#, html_escape(s)))
        .unwrap_or_default();

    let content = format!(
        r#"<article class="card">
            <h1>{title}</h1>
            <p>{company}</p>
            <p class="muted">{location}</p>
            {salary}
            <div class="prose">{description}</div>
            <p class="muted">Posted: {posted}</p>
            <p><a class="button" href="{apply}" target="_blank" rel="noopener noreferrer">Apply Now</a></p>
        </article>"#,
        title = html_escape(&job.title),
        company = html_escape(&job.company),
        location = html_escape(&job.location),
        salary = salary,
        description = job.description,
        posted = format_display_date(&job.posted_date),
        apply = safe_url(&job.application_link),
    );

    layout(
        site,
        &format!("{} at {} | {}", job.title, job.company, site.site_name),
        &format!("{} at {} in {}", job.title, job.company, job.location),
        &content,
    )
}

/// Articles index: newest first with plain-text teasers
pub fn article_listing(site: &SiteConfig, articles: &[Article]) -> String {
    let body = if articles.is_empty() {
        r#"<p class="muted">No articles published yet. Check back soon!</p>"#.to_string()
    } else {
        let cards: String = articles
            .iter()
            .map(|article| {
                let href = html_escape(&article.path());
                format!(
                    r#"<div class="card">
                <a href="{href}"><h2>{title}</h2></a>
                <p class="muted">By {author} on {date}</p>
                <p>{excerpt}</p>
                <a href="{href}">Read More</a>
            </div>"#,
                    href = href,
                    title = html_escape(&article.title),
                    author = html_escape(&article.author),
                    date = format_display_date(&article.publish_date),
                    excerpt = html_escape(&article.excerpt(EXCERPT_CHARS)),
                )
            })
            .collect();
        format!(r#"<div class="stack">{}</div>"#, cards)
    };

    layout(
        site,
        &format!("AI Articles & Guides | {}", site.site_name),
        "Explore articles and guides on AI careers, resume writing, interview tips, and more.",
        &format!("<h1>AI Articles &amp; Guides</h1>\n{}", body),
    )
}

/// Article detail page. The content is trusted markup from the store.
pub fn article_detail(site: &SiteConfig, article: &Article) -> String {
    let image = article
        .image_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<img class="hero-image" src="{}" alt="{}">"#,
                safe_url(url),
                html_escape(&article.title)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"<article class="card">
            <h1>{title}</h1>
            <p class="muted">By {author} on {date}</p>
            {image}
            <div class="prose">{content}</div>
        </article>"#,
        title = html_escape(&article.title),
        author = html_escape(&article.author),
        date = format_display_date(&article.publish_date),
        image = image,
        content = article.content,
    );

    layout(
        site,
        &format!("{} by {} | {}", article.title, article.author, site.site_name),
        &article.excerpt(160),
        &content,
    )
}

/// Friendly 404 body; `what` is "Job" or "Article"
pub fn not_found(site: &SiteConfig, what: &str, back_href: &str, back_label: &str) -> String {
    let content = format!(
        r#"<div class="card">
            <h1>{what} Not Found</h1>
            <p class="muted">The {lower} you are looking for does not exist or has been removed.</p>
            <p><a class="button" href="{href}">{label}</a></p>
        </div>"#,
        what = html_escape(what),
        lower = html_escape(&what.to_lowercase()),
        href = html_escape(back_href),
        label = html_escape(back_label),
    );

    layout(
        site,
        &format!("{} Not Found | {}", what, site.site_name),
        &format!("The {} you are looking for does not exist.", what.to_lowercase()),
        &content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn job() -> JobPosting {
        JobPosting {
            id: "j1".to_string(),
            title: "AI Ethics Specialist".to_string(),
            company: "IBM".to_string(),
            description: "<p>Guide <strong>responsible</strong> AI</p>".to_string(),
            location: "Armonk, NY (Remote options available)".to_string(),
            salary_range: Some("$120,000 - $190,000".to_string()),
            posted_date: Utc.with_ymd_and_hms(2025, 6, 20, 11, 0, 0).unwrap(),
            application_link: "https://www.ibm.com/careers/job/12348".to_string(),
            tags: vec!["AI Ethics".to_string(), "Policy".to_string(), "Remote".to_string()],
        }
    }

    fn article() -> Article {
        Article {
            id: "a1".to_string(),
            slug: "ethical-considerations-in-ai".to_string(),
            title: "Navigating the Ethical Landscape".to_string(),
            author: "Dr. Emily Chen".to_string(),
            publish_date: Utc.with_ymd_and_hms(2025, 6, 29, 10, 0, 0).unwrap(),
            content: "<p>As AI becomes more integrated</p>".to_string(),
            image_url: Some("/images/ethical-ai.jpg".to_string()),
        }
    }

    #[test]
    fn test_html_escape_store_text() {
        let location = "Armonk, NY (Remote options available)";
        assert_eq!(html_escape(location), location);
        assert_eq!(html_escape("R&D <Lead>"), "R&amp;D &lt;Lead&gt;");
        assert_eq!(
            html_escape(r#"O'Brien "Labs""#),
            "O&#x27;Brien &quot;Labs&quot;"
        );
        assert_eq!(html_escape("Zürich"), "Zürich");
    }

    #[test]
    fn test_safe_url() {
        assert_eq!(safe_url("https://openai.com/careers"), "https://openai.com/careers");
        assert_eq!(safe_url("/images/a.jpg"), "/images/a.jpg");
        assert_eq!(safe_url("javascript:alert(1)"), "#");
        assert_eq!(safe_url("https://x.com/?a=1&b=2"), "https://x.com/?a=1&amp;b=2");
    }

    #[test]
    fn test_job_card_links_to_detail() {
        let html = job_card(&job());
        assert!(html.contains(r#"href="/jobs/j1""#));
        assert!(html.contains("AI Ethics Specialist"));
        assert!(html.contains(r#"<span class="tag">Policy</span>"#));
        assert!(html.contains("$120,000 - $190,000"));
    }

    #[test]
    fn test_job_listing_empty_state() {
        let html = job_listing(&SiteConfig::default(), &[]);
        assert!(html.contains("No jobs posted yet. Check back soon!"));
        assert!(html.contains("<title>Latest AI Jobs | AI Job Spot</title>"));
    }

    #[test]
    fn test_job_detail_renders_markup_and_date() {
        let html = job_detail(&SiteConfig::default(), &job());
        assert!(html.contains("<strong>responsible</strong>"));
        assert!(html.contains("Posted: June 20, 2025"));
        assert!(html.contains("Salary: $120,000 - $190,000"));
        assert!(html.contains(r#"href="https://www.ibm.com/careers/job/12348" target="_blank" rel="noopener noreferrer""#));
    }

    #[test]
    fn test_job_detail_escapes_plain_fields() {
        let mut job = job();
        job.title = "<img src=x onerror=alert(1)>".to_string();
        job.salary_range = None;
        let html = job_detail(&SiteConfig::default(), &job);
        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("Salary:"));
    }

    #[test]
    fn test_article_listing() {
        let html = article_listing(&SiteConfig::default(), &[article()]);
        assert!(html.contains(r#"href="/articles/ethical-considerations-in-ai""#));
        assert!(html.contains("By Dr. Emily Chen on June 29, 2025"));
        assert!(html.contains("As AI becomes more integrated"));
        assert!(html.contains("Read More"));

        let empty = article_listing(&SiteConfig::default(), &[]);
        assert!(empty.contains("No articles published yet. Check back soon!"));
    }

    #[test]
    fn test_article_detail_with_image() {
        let html = article_detail(&SiteConfig::default(), &article());
        assert!(html.contains(r#"src="/images/ethical-ai.jpg""#));
        assert!(html.contains("<p>As AI becomes more integrated</p>"));
        assert!(html.contains("<title>Navigating the Ethical Landscape by Dr. Emily Chen | AI Job Spot</title>"));
    }

    #[test]
    fn test_not_found() {
        let html = not_found(&SiteConfig::default(), "Article", "/articles", "Back to Articles");
        assert!(html.contains("<h1>Article Not Found</h1>"));
        assert!(html.contains("The article you are looking for does not exist"));
        assert!(html.contains(r#"href="/articles""#));
    }
}
