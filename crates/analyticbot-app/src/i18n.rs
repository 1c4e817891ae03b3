// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Self::En => Direction::Ltr,
            Self::Ar => Direction::Rtl,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::En => Self::Ar,
            Self::Ar => Self::En,
        }
    }

    const fn catalog(self) -> &'static Catalog {
        match self {
            Self::En => EN,
            Self::Ar => AR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

type Catalog = [(&'static str, &'static str)];

/// Current language plus its translation table.
///
/// Language, table and direction always change together through
/// [`Localizer::set_language`], so callers never see a mixed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localizer {
    language: Language,
    catalog: &'static Catalog,
    direction: Direction,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl Localizer {
    pub const fn new(language: Language) -> Self {
        Self {
            language,
            catalog: language.catalog(),
            direction: language.direction(),
        }
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns true when the language actually changed.
    pub fn set_language(&mut self, language: Language) -> bool {
        if language == self.language {
            return false;
        }
        *self = Self::new(language);
        true
    }

    pub fn toggle(&mut self) -> Language {
        self.set_language(self.language.toggled());
        self.language
    }

    /// Unknown keys come back verbatim.
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        self.catalog
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, text)| *text)
            .unwrap_or(key)
    }

    /// Translates `key` and substitutes `{name}` placeholders.
    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut out = self.translate(key).to_owned();
        for (name, value) in args {
            out = out.replace(&format!("{{{name}}}"), value);
        }
        out
    }
}

const EN: &Catalog = &[
    ("app_name", "AnalyticBot"),
    ("chat", "Chat"),
    ("admin_dashboard", "Admin Dashboard"),
    ("admin_user", "Admin User"),
    ("standard_user", "Standard User"),
    ("switch_role", "Switch Role"),
    ("chat_assistant", "Chat Assistant"),
    ("new_chat", "New Chat"),
    ("ask_placeholder", "Ask about your data..."),
    ("analyzing", "Analyzing data..."),
    (
        "welcome_message",
        "Hello! I'm your Data Assistant. How can I help you visualize your data today?",
    ),
    (
        "error_message",
        "Sorry, I encountered an error processing your request.",
    ),
    (
        "confirm_new_chat",
        "Are you sure you want to start a new chat? This will clear all history.",
    ),
    ("confirm_hint", "y = yes, n = no"),
    ("data_upload", "Data Upload"),
    ("click_to_upload", "Click to upload"),
    ("drag_and_drop", "or drag and drop"),
    ("supported_files", "CSV, Excel, PDF files supported"),
    ("upload_data", "Upload Data"),
    ("uploading", "Uploading..."),
    ("upload_path_prompt", "File to upload:"),
    ("unsupported_upload", "Unsupported file type: {name}"),
    ("active_users", "Active Users"),
    ("uploaded_files", "Uploaded Files"),
    ("preview", "Preview"),
    ("no_files", "No files uploaded"),
    ("select_file", "Select a file to preview data."),
    (
        "showing_rows",
        "Showing first 10 rows of {total} total rows",
    ),
    ("none", "None"),
    ("no_chart_data", "No data available for visualization"),
    ("unsupported_chart", "Unsupported chart type: {type}"),
    ("no_table_data", "No data available"),
    ("success", "Success"),
    ("error", "Error"),
    ("image", "Chart"),
    ("language", "Language"),
    ("role", "Role"),
    ("quit_hint", "Esc quit"),
];

const AR: &Catalog = &[
    ("app_name", "بوت التحليل"),
    ("chat", "محادثة"),
    ("admin_dashboard", "لوحة التحكم"),
    ("admin_user", "مستخدم مسؤول"),
    ("standard_user", "مستخدم عادي"),
    ("switch_role", "تبديل الدور"),
    ("chat_assistant", "مساعد المحادثة"),
    ("new_chat", "محادثة جديدة"),
    ("ask_placeholder", "اسأل عن بياناتك..."),
    ("analyzing", "جاري تحليل البيانات..."),
    (
        "welcome_message",
        "مرحباً! أنا مساعد البيانات الخاص بك. كيف يمكنني مساعدتك في تصور بياناتك اليوم؟",
    ),
    ("error_message", "عذراً، واجهت خطأ أثناء معالجة طلبك."),
    (
        "confirm_new_chat",
        "هل أنت متأكد أنك تريد بدء محادثة جديدة؟ سيؤدي هذا إلى مسح كل السجل.",
    ),
    ("confirm_hint", "y = نعم، n = لا"),
    ("data_upload", "رفع البيانات"),
    ("click_to_upload", "انقر للرفع"),
    ("drag_and_drop", "أو اسحب وأفلت"),
    ("supported_files", "ملفات CSV, Excel, PDF مدعومة"),
    ("upload_data", "رفع البيانات"),
    ("uploading", "جاري الرفع..."),
    ("upload_path_prompt", "الملف المراد رفعه:"),
    ("unsupported_upload", "نوع ملف غير مدعوم: {name}"),
    ("active_users", "المستخدمين النشطين"),
    ("uploaded_files", "الملفات المرفوعة"),
    ("preview", "معاينة"),
    ("no_files", "لا توجد ملفات مرفوعة"),
    ("select_file", "اختر ملفاً لمعاينة البيانات."),
    ("showing_rows", "عرض أول 10 صفوف من إجمالي {total} صف"),
    ("none", "لا شيء"),
    ("no_chart_data", "لا توجد بيانات متاحة للعرض"),
    ("unsupported_chart", "نوع مخطط غير مدعوم: {type}"),
    ("no_table_data", "لا توجد بيانات متاحة"),
    ("success", "نجاح"),
    ("error", "خطأ"),
    ("image", "مخطط"),
    ("language", "اللغة"),
    ("role", "الدور"),
    ("quit_hint", "Esc خروج"),
];
