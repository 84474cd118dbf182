//! Bilingual translation table and language selection.
//!
//! Dotted keys map to static Vietnamese/English strings. Lookup falls
//! back to the key itself so a missing entry is visible on the page
//! instead of a panic. The visitor's choice is made with `?lang=en|vi`
//! and persisted in the session.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Site languages. Vietnamese is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Vi,
    En,
}

impl Lang {
    /// Parse a `?lang=` query value. Unknown values are ignored.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "vi" => Some(Lang::Vi),
            "en" => Some(Lang::En),
            _ => None,
        }
    }

    /// Two-letter code as used in `<html lang>` and the submission row.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Vi => "vi",
            Lang::En => "en",
        }
    }
}

/// Look up a translation. Returns the key itself when unknown.
pub fn t(lang: Lang, key: &'static str) -> &'static str {
    match table().get(key) {
        Some((vi, en)) => match lang {
            Lang::Vi => vi,
            Lang::En => en,
        },
        None => key,
    }
}

fn table() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    static TABLE: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> = OnceLock::new();
    TABLE.get_or_init(|| TRANSLATIONS.iter().map(|&(k, vi, en)| (k, (vi, en))).collect())
}

// (key, vietnamese, english)
static TRANSLATIONS: &[(&str, &str, &str)] = &[
    ("nav.home", "Trang chủ", "Home"),
    ("nav.about", "Giới thiệu", "About"),
    ("nav.contact", "Liên hệ", "Contact"),
    (
        "home.hero.title",
        "In ấn & Bao bì chất lượng cao",
        "High-quality Printing & Packaging",
    ),
    (
        "home.hero.subtitle",
        "Đối tác sản xuất in ấn số lượng lớn cho doanh nghiệp của bạn",
        "Your high-volume print production partner",
    ),
    ("home.hero.cta", "Yêu cầu báo giá", "Request a quote"),
    ("home.services.title", "Dịch vụ của chúng tôi", "Our services"),
    ("home.services.packaging", "Bao bì giấy", "Paper packaging"),
    ("home.services.offset", "In offset", "Offset printing"),
    ("home.services.labels", "Tem nhãn", "Labels & stickers"),
    ("about.hero.title", "Về La TRUNG", "About La TRUNG"),
    (
        "about.hero.subtitle",
        "Hơn 20 năm kinh nghiệm trong ngành in ấn",
        "More than 20 years in the printing industry",
    ),
    (
        "about.body.intro",
        "La TRUNG là nhà in và sản xuất bao bì đặt tại TP. Hồ Chí Minh, phục vụ khách hàng trong và ngoài nước.",
        "La TRUNG is a printing and packaging manufacturer based in Ho Chi Minh City, serving customers at home and abroad.",
    ),
    (
        "about.body.capacity",
        "Nhà máy của chúng tôi vận hành các dây chuyền in offset và thành phẩm hiện đại với năng lực hàng triệu sản phẩm mỗi tháng.",
        "Our plant runs modern offset presses and finishing lines with a capacity of millions of units per month.",
    ),
    ("contact.hero.title", "Liên hệ", "Contact Us"),
    (
        "contact.hero.subtitle",
        "Gửi yêu cầu báo giá hoặc câu hỏi của bạn cho chúng tôi",
        "Send us your quote request or question",
    ),
    ("contact.info.title", "Thông tin liên hệ", "Contact information"),
    ("contact.info.email", "Email", "Email"),
    ("contact.info.phone", "Điện thoại", "Phone"),
    ("contact.info.location", "Địa chỉ", "Location"),
    (
        "contact.info.address",
        "Quận Bình Tân, TP. Hồ Chí Minh, Việt Nam",
        "Binh Tan District, Ho Chi Minh City, Vietnam",
    ),
    ("contact.info.business_hours", "Giờ làm việc", "Business hours"),
    (
        "contact.info.hours_weekday",
        "Thứ 2 – Thứ 6: 8:00 – 17:30",
        "Monday – Friday: 8:00 – 17:30",
    ),
    (
        "contact.info.hours_saturday",
        "Thứ 7: 8:00 – 12:00",
        "Saturday: 8:00 – 12:00",
    ),
    ("contact.form.title", "Gửi yêu cầu", "Send an inquiry"),
    (
        "contact.form.intro",
        "Điền thông tin bên dưới, chúng tôi sẽ phản hồi trong vòng 24 giờ làm việc.",
        "Fill in the form below and we will get back to you within 24 business hours.",
    ),
    ("contact.form.name", "Họ và tên", "Full name"),
    ("contact.form.email", "Email", "Email"),
    ("contact.form.company", "Công ty", "Company"),
    ("contact.form.phone", "Số điện thoại", "Phone"),
    ("contact.form.service", "Dịch vụ", "Service"),
    (
        "contact.form.service_placeholder",
        "Ví dụ: hộp giấy, catalogue, tem nhãn…",
        "E.g. paper boxes, catalogues, labels…",
    ),
    ("contact.form.quantity", "Số lượng", "Quantity"),
    (
        "contact.form.quantity_placeholder",
        "Ví dụ: 10.000 chiếc",
        "E.g. 10,000 units",
    ),
    ("contact.form.message", "Nội dung", "Message"),
    (
        "contact.form.message_placeholder",
        "Mô tả yêu cầu của bạn…",
        "Describe your requirements…",
    ),
    ("contact.form.submit", "Gửi yêu cầu", "Submit"),
    (
        "contact.errors.invalid_email",
        "Vui lòng nhập địa chỉ email hợp lệ.",
        "Please enter a valid email address.",
    ),
    (
        "contact.errors.invalid_phone",
        "Vui lòng nhập số điện thoại hợp lệ.",
        "Please enter a valid phone number.",
    ),
    (
        "contact.errors.rate_limit",
        "Bạn đã gửi quá nhiều yêu cầu. Vui lòng thử lại sau {minutes} phút.",
        "Too many submissions. Please try again in {minutes} minutes.",
    ),
    (
        "contact.errors.spam_detected",
        "Yêu cầu bị từ chối.",
        "Spam detected.",
    ),
    (
        "contact.errors.database_error",
        "Không thể lưu yêu cầu của bạn. Vui lòng thử lại.",
        "Failed to save your submission. Please try again.",
    ),
    (
        "contact.errors.csrf",
        "Xác thực bảo mật thất bại. Vui lòng tải lại trang và thử lại.",
        "Security validation failed. Please refresh the page and try again.",
    ),
    (
        "contact.success.title",
        "Đã gửi thành công!",
        "Message sent!",
    ),
    (
        "contact.success.message",
        "Cảm ơn bạn đã liên hệ. Chúng tôi sẽ phản hồi trong thời gian sớm nhất.",
        "Thank you for contacting us. We will get back to you shortly.",
    ),
    ("contact.success.btn", "Gửi yêu cầu khác", "Send another inquiry"),
    (
        "footer.tagline",
        "In ấn & Bao bì từ năm 2003",
        "Printing & Packaging since 2003",
    ),
    (
        "footer.rights",
        "Bản quyền thuộc về La TRUNG.",
        "All rights reserved by La TRUNG.",
    ),
    ("error.404.title", "Không tìm thấy trang", "Page not found"),
    (
        "error.404.message",
        "Trang bạn tìm kiếm không tồn tại hoặc đã được di chuyển.",
        "The page you are looking for does not exist or has moved.",
    ),
    ("error.404.home", "Về trang chủ", "Back to home"),
    ("error.500.title", "Đã xảy ra lỗi", "Something went wrong"),
    (
        "error.500.message",
        "Máy chủ gặp sự cố khi xử lý yêu cầu của bạn. Vui lòng thử lại sau.",
        "The server hit a problem handling your request. Please try again later.",
    ),
    ("error.500.home", "Về trang chủ", "Back to home"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_language() {
        assert_eq!(t(Lang::En, "nav.home"), "Home");
        assert_eq!(t(Lang::Vi, "nav.home"), "Trang chủ");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        assert_eq!(t(Lang::En, "no.such.key"), "no.such.key");
    }

    #[test]
    fn query_parsing() {
        assert_eq!(Lang::from_query("en"), Some(Lang::En));
        assert_eq!(Lang::from_query("vi"), Some(Lang::Vi));
        assert_eq!(Lang::from_query("fr"), None);
        assert_eq!(Lang::default(), Lang::Vi);
    }
}
