//! Page bodies: home, about, contact (form, success), 404, 500.

use crate::i18n::{t, Lang};
use crate::views::escape_html;
use crate::views::layout::{hero, page};

/// Trimmed form values echoed back into the form after a rejection.
#[derive(Debug, Clone, Default)]
pub struct ContactFormValues {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub service: String,
    pub quantity: String,
    pub message: String,
}

pub fn home(lang: Lang, site_name: &str) -> String {
    let content = format!(
        "{hero}\
<section><div class=\"container\">\
<h2>{services_title}</h2>\
<ul>\
<li>{packaging}</li>\
<li>{offset}</li>\
<li>{labels}</li>\
</ul>\
<p><a class=\"btn\" href=\"/contact\">{cta}</a></p>\
</div></section>",
        hero = hero(t(lang, "home.hero.title"), t(lang, "home.hero.subtitle")),
        services_title = t(lang, "home.services.title"),
        packaging = t(lang, "home.services.packaging"),
        offset = t(lang, "home.services.offset"),
        labels = t(lang, "home.services.labels"),
        cta = t(lang, "home.hero.cta"),
    );
    page(lang, site_name, "home", &content)
}

pub fn about(lang: Lang, site_name: &str) -> String {
    let title = format!("{} | {}", t(lang, "about.hero.title"), site_name);
    let content = format!(
        "{hero}\
<section><div class=\"container\">\
<p>{intro}</p>\
<p>{capacity}</p>\
</div></section>",
        hero = hero(t(lang, "about.hero.title"), t(lang, "about.hero.subtitle")),
        intro = t(lang, "about.body.intro"),
        capacity = t(lang, "about.body.capacity"),
    );
    page(lang, &title, "about", &content)
}

fn text_input(id: &str, label: &str, value: &str, placeholder: &str) -> String {
    format!(
        "<div class=\"form-group\">\
<label for=\"{id}\">{label}</label>\
<input type=\"text\" id=\"{id}\" name=\"{id}\" value=\"{value}\" placeholder=\"{placeholder}\">\
</div>",
        id = id,
        label = label,
        value = escape_html(value),
        placeholder = escape_html(placeholder),
    )
}

/// The contact page carrying the form, with an optional inline error
/// and the visitor's previous values preserved.
pub fn contact_form(
    lang: Lang,
    site_name: &str,
    csrf_token: &str,
    error: Option<&str>,
    values: &ContactFormValues,
) -> String {
    let title = format!("{} | {}", t(lang, "contact.hero.title"), site_name);

    let error_html = match error {
        Some(message) => format!("<div class=\"form-error\">{}</div>", escape_html(message)),
        None => String::new(),
    };

    let content = format!(
        "{hero}\
<section class=\"contact-section\"><div class=\"container\">\
<h2>{info_title}</h2>\
<p>{info_email}: <a href=\"mailto:info@latrungprint.vn\">info@latrungprint.vn</a></p>\
<p>{info_phone}: <a href=\"tel:+842838632759\">+84 (028) 38-632-759</a></p>\
<p>{info_location}: {info_address}</p>\
<p>{info_hours}: {hours_weekday}, {hours_saturday}</p>\
<h2>{form_title}</h2>\
<p class=\"form-intro\">{form_intro}</p>\
{error_html}\
<form method=\"POST\" action=\"/contact\" class=\"contact-form\" id=\"contactForm\">\
<input type=\"hidden\" name=\"csrf_token\" value=\"{csrf_token}\">\
<div class=\"honeypot\">\
<label for=\"website\">Website</label>\
<input type=\"text\" id=\"website\" name=\"website\" tabindex=\"-1\" autocomplete=\"off\">\
</div>\
{name_input}{email_input}{company_input}{phone_input}{service_input}{quantity_input}\
<div class=\"form-group\">\
<label for=\"message\">{message_label}</label>\
<textarea id=\"message\" name=\"message\" rows=\"6\" placeholder=\"{message_placeholder}\">{message_value}</textarea>\
</div>\
<button type=\"submit\" class=\"btn\">{submit}</button>\
</form>\
</div></section>",
        hero = hero(t(lang, "contact.hero.title"), t(lang, "contact.hero.subtitle")),
        info_title = t(lang, "contact.info.title"),
        info_email = t(lang, "contact.info.email"),
        info_phone = t(lang, "contact.info.phone"),
        info_location = t(lang, "contact.info.location"),
        info_address = t(lang, "contact.info.address"),
        info_hours = t(lang, "contact.info.business_hours"),
        hours_weekday = t(lang, "contact.info.hours_weekday"),
        hours_saturday = t(lang, "contact.info.hours_saturday"),
        form_title = t(lang, "contact.form.title"),
        form_intro = t(lang, "contact.form.intro"),
        error_html = error_html,
        csrf_token = escape_html(csrf_token),
        name_input = text_input("name", t(lang, "contact.form.name"), &values.name, ""),
        email_input = text_input("email", t(lang, "contact.form.email"), &values.email, ""),
        company_input = text_input("company", t(lang, "contact.form.company"), &values.company, ""),
        phone_input = text_input("phone", t(lang, "contact.form.phone"), &values.phone, ""),
        service_input = text_input(
            "service",
            t(lang, "contact.form.service"),
            &values.service,
            t(lang, "contact.form.service_placeholder"),
        ),
        quantity_input = text_input(
            "quantity",
            t(lang, "contact.form.quantity"),
            &values.quantity,
            t(lang, "contact.form.quantity_placeholder"),
        ),
        message_label = t(lang, "contact.form.message"),
        message_placeholder = escape_html(t(lang, "contact.form.message_placeholder")),
        message_value = escape_html(&values.message),
        submit = t(lang, "contact.form.submit"),
    );
    page(lang, &title, "contact", &content)
}

/// Success card shown after an accepted submission.
pub fn contact_success(lang: Lang, site_name: &str) -> String {
    let title = format!("{} | {}", t(lang, "contact.hero.title"), site_name);
    let content = format!(
        "{hero}\
<section><div class=\"container\"><div class=\"form-success\">\
<h3>{success_title}</h3>\
<p>{success_message}</p>\
<a href=\"/contact\" class=\"btn\">{success_btn}</a>\
</div></div></section>",
        hero = hero(t(lang, "contact.hero.title"), t(lang, "contact.hero.subtitle")),
        success_title = t(lang, "contact.success.title"),
        success_message = t(lang, "contact.success.message"),
        success_btn = t(lang, "contact.success.btn"),
    );
    page(lang, &title, "contact", &content)
}

pub fn not_found(lang: Lang, site_name: &str) -> String {
    let title = format!("404 | {}", site_name);
    let content = format!(
        "<section><div class=\"container\" style=\"text-align:center\">\
<h1>404</h1>\
<h2>{title}</h2>\
<p>{message}</p>\
<a href=\"/\" class=\"btn\">{home}</a>\
</div></section>",
        title = t(lang, "error.404.title"),
        message = t(lang, "error.404.message"),
        home = t(lang, "error.404.home"),
    );
    page(lang, &title, "", &content)
}

pub fn server_error(lang: Lang, site_name: &str, detail: Option<&str>) -> String {
    let title = format!("500 | {}", site_name);
    let detail_html = match detail {
        Some(detail) => format!("<pre>{}</pre>", escape_html(detail)),
        None => String::new(),
    };
    let content = format!(
        "<section><div class=\"container\" style=\"text-align:center\">\
<h1>500</h1>\
<h2>{title}</h2>\
<p>{message}</p>\
{detail_html}\
<a href=\"/\" class=\"btn\">{home}</a>\
</div></section>",
        title = t(lang, "error.500.title"),
        message = t(lang, "error.500.message"),
        detail_html = detail_html,
        home = t(lang, "error.500.home"),
    );
    page(lang, &title, "", &content)
}

/// Body for the 403 response on a CSRF failure.
pub fn forbidden(lang: Lang, site_name: &str, detail: Option<&str>) -> String {
    let title = format!("403 | {}", site_name);
    let detail_html = match detail {
        Some(detail) => format!("<pre>{}</pre>", escape_html(detail)),
        None => String::new(),
    };
    let content = format!(
        "<section><div class=\"container\" style=\"text-align:center\">\
<h1>403</h1>\
<p>{message}</p>\
{detail_html}\
</div></section>",
        message = t(lang, "contact.errors.csrf"),
        detail_html = detail_html,
    );
    page(lang, &title, "", &content)
}
