//! Shared page chrome: header with language switcher, footer, styles.

use chrono::{Datelike, Utc};

use crate::i18n::{t, Lang};
use crate::views::escape_html;

const STYLES: &str = "\
body { font-family: 'Inter', Arial, sans-serif; margin: 0; color: #333; line-height: 1.6; }\
.container { max-width: 960px; margin: 0 auto; padding: 0 20px; }\
.site-header { background: #fff; border-bottom: 1px solid #eee; }\
.site-header .container { display: flex; justify-content: space-between; align-items: center; padding: 16px 20px; }\
.site-header a { color: #333; text-decoration: none; margin-left: 16px; }\
.site-header a.active { color: #2DBAA7; }\
.brand { font-weight: 700; font-size: 1.2em; color: #2DBAA7; }\
.lang-switch a { font-size: 0.9em; color: #888; }\
.page-hero { background: #2DBAA7; color: #fff; padding: 48px 0; text-align: center; }\
.page-hero p { opacity: 0.9; }\
section { padding: 32px 0; }\
.form-group { margin-bottom: 16px; }\
.form-group label { display: block; font-weight: 600; margin-bottom: 4px; }\
.form-group input, .form-group textarea { width: 100%; padding: 8px; border: 1px solid #ccc; border-radius: 4px; }\
.form-error { background: #fdecea; color: #b71c1c; padding: 12px 16px; border-radius: 4px; margin-bottom: 16px; }\
.form-success { text-align: center; padding: 32px; }\
.btn { display: inline-block; background: #2DBAA7; color: #fff; padding: 10px 24px; border: 0; border-radius: 4px; cursor: pointer; text-decoration: none; }\
.site-footer { background: #f9f9f9; color: #666; padding: 24px 0; text-align: center; font-size: 0.9em; margin-top: 32px; }\
.honeypot { position: absolute; left: -9999px; }";

/// Wrap page content in the shared layout.
pub fn page(lang: Lang, title: &str, active: &str, content: &str) -> String {
    let nav_item = |href: &str, key: &'static str, name: &str| {
        let class = if active == name { " class=\"active\"" } else { "" };
        format!("<a href=\"{href}\"{class}>{}</a>", t(lang, key))
    };

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"{lang_code}\">\n\
<head>\n\
<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>{title}</title>\n\
<style>{styles}</style>\n\
</head>\n\
<body>\n\
<header class=\"site-header\"><div class=\"container\">\
<a href=\"/\" class=\"brand\">La TRUNG</a>\
<nav>{nav_home}{nav_about}{nav_contact}\
<span class=\"lang-switch\"><a href=\"?lang=vi\">VI</a> | <a href=\"?lang=en\">EN</a></span>\
</nav>\
</div></header>\n\
{content}\n\
<footer class=\"site-footer\"><div class=\"container\">\
<p>{tagline}</p>\
<p>© {year} {rights}</p>\
</div></footer>\n\
</body>\n\
</html>\n",
        lang_code = lang.code(),
        title = escape_html(title),
        styles = STYLES,
        nav_home = nav_item("/", "nav.home", "home"),
        nav_about = nav_item("/about", "nav.about", "about"),
        nav_contact = nav_item("/contact", "nav.contact", "contact"),
        content = content,
        tagline = t(lang, "footer.tagline"),
        year = Utc::now().year(),
        rights = t(lang, "footer.rights"),
    )
}

/// The colored hero band at the top of each page.
pub fn hero(title: &str, subtitle: &str) -> String {
    format!(
        "<section class=\"page-hero\"><div class=\"container\">\
<h1>{}</h1><p>{}</p></div></section>",
        title, subtitle
    )
}
