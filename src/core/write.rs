use crate::domain::model::{Blocklist, Blocklists, OutputFormat, OutputSpec, WrittenFile};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::timestamp::current_datetime_str;

/// One newline-terminated line per entry, no header or footer.
pub fn render(list: &Blocklist, format: OutputFormat) -> String {
    let mut out = String::with_capacity(list.len() * 24);
    for entry in list.iter() {
        out.push_str(&format.render_line(entry));
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub spec: OutputSpec,
    pub content: String,
    pub entries: usize,
}

pub fn render_all(lists: &Blocklists, outputs: &[OutputSpec]) -> Vec<RenderedOutput> {
    outputs
        .iter()
        .map(|spec| {
            let list = lists.get(spec.category);
            RenderedOutput {
                spec: spec.clone(),
                content: render(list, spec.format),
                entries: list.len(),
            }
        })
        .collect()
}

/// Hands every rendered file to storage in one batch. Storage stages all of
/// them before replacing any, so a failed write leaves the previous output
/// set in place.
pub async fn write_all<S: Storage>(
    storage: &S,
    rendered: Vec<RenderedOutput>,
) -> Result<Vec<WrittenFile>> {
    let files = rendered
        .iter()
        .map(|output| (output.spec.filename.clone(), output.content.clone().into_bytes()))
        .collect();
    let paths = storage.write_files(files).await?;

    let stamp = current_datetime_str();
    let written = rendered
        .into_iter()
        .zip(paths)
        .map(|(output, path)| {
            tracing::info!(
                "{} {} entries ({}) written to {} at {}",
                output.entries,
                output.spec.category,
                output.spec.format,
                path,
                stamp
            );
            WrittenFile {
                path,
                category: output.spec.category,
                format: output.spec.format,
                entries: output.entries,
            }
        })
        .collect();

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::{normalize_ips, normalize_urls};
    use crate::domain::model::{default_outputs, Category};

    #[test]
    fn test_render_formats() {
        let list = normalize_urls(["evil.com"]);
        assert_eq!(render(&list, OutputFormat::Plain), "evil.com\n");
        assert_eq!(render(&list, OutputFormat::Adblock), "||evil.com^\n");
        assert_eq!(render(&list, OutputFormat::AdblockAll), "||evil.com^$all\n");
        assert_eq!(render(&list, OutputFormat::DnsSinkhole), "evil.com\n");
    }

    #[test]
    fn test_render_empty_list() {
        let list = normalize_ips(Vec::<String>::new());
        assert_eq!(render(&list, OutputFormat::Plain), "");
    }

    #[test]
    fn test_render_all_follows_output_specs() {
        let urls = normalize_urls(["evil.com/login", "bad.net"]);
        let lists = Blocklists {
            domains: crate::core::normalize::normalize_domains(urls.iter().map(|e| e.as_str())),
            urls,
            ips: normalize_ips(["1.2.3.4"]),
        };

        let rendered = render_all(&lists, &default_outputs());
        assert_eq!(rendered.len(), 5);

        let by_name = |name: &str| {
            rendered
                .iter()
                .find(|r| r.spec.filename == name)
                .map(|r| r.content.clone())
                .unwrap()
        };
        assert_eq!(by_name("global-anti-scam-org-scam-urls.txt"), "bad.net\nevil.com/login\n");
        assert_eq!(by_name("global-anti-scam-org-scam-ips.txt"), "1.2.3.4\n");
        assert_eq!(by_name("global-anti-scam-org-scam-urls-pihole.txt"), "bad.net\nevil.com\n");
        assert_eq!(
            by_name("global-anti-scam-org-scam-urls-adblock.txt"),
            "||bad.net^\n||evil.com^\n"
        );
        assert_eq!(
            by_name("global-anti-scam-org-scam-urls-ublock.txt"),
            "||bad.net^$all\n||evil.com^$all\n"
        );
        assert!(rendered
            .iter()
            .filter(|r| r.spec.category == Category::Domain)
            .all(|r| r.entries == 2));
    }
}
