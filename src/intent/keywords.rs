// Keyword tables for the quick-add classifier
//
// Everything here is stored already normalized: lower-case, plain ' apostrophe.
// Single-word keywords match as token prefixes so Uzbek suffixes still hit
// ("maqsadimga" -> "maqsad"). Keywords with a space match as substrings.

use chrono::Weekday;

/// Words that make a phrase look like a to-do
pub const TASK_KEYWORDS: &[&str] = &[
    "kerak",
    "qilish",
    "bajar",
    "tayyorla",
    "meeting",
    "uchrashuv",
    "yig'ilish",
    "qo'ng'iroq",
    "vazifa",
    "eslat",
    "yozish",
    "tekshir",
    "topshir",
    "yuborish",
    "borish",
    "o'qish",
    "task",
    "todo",
];

/// Money going out
pub const EXPENSE_KEYWORDS: &[&str] = &[
    "sarf",
    "to'la",
    "to'lov",
    "xarajat",
    "xarid",
    "sotib ol",
    "chiqim",
    "ketdi",
    "berdim",
];

/// Money coming in
pub const INCOME_KEYWORDS: &[&str] = &[
    "maosh",
    "oylik",
    "daromad",
    "tushdi",
    "kirim",
    "sotdim",
    "foyda",
    "bonus",
    "ish haqi",
    "avans",
    "pul oldim",
    "qaytardi",
];

// Count toward finance but say nothing about direction
pub const MONEY_KEYWORDS: &[&str] = &["so'm", "pul", "karta"];

pub const GOAL_KEYWORDS: &[&str] = &[
    "maqsad",
    "jamg'ar",
    "orzu",
    "qo'sh",
    "to'ldir",
    "ajratdim",
];

/// Goal words that mean "put money toward an existing goal"
pub const GOAL_UPDATE_KEYWORDS: &[&str] = &["qo'sh", "to'ldir", "ajratdim", "jamg'ardim"];

pub const HIGH_PRIORITY_KEYWORDS: &[&str] = &[
    "shoshilinch",
    "zudlik",
    "tezda",
    "darhol",
    "muhim",
    "urgent",
    "srochno",
];

pub const LOW_PRIORITY_KEYWORDS: &[&str] = &[
    "keyinroq",
    "shoshilmas",
    "bo'sh vaqt",
    "vaqt bo'lsa",
    "later",
];

/// Category used when nothing in the dictionary matches
pub const DEFAULT_CATEGORY: &str = "Boshqa";

// Order matters: first category with a hit wins
pub const EXPENSE_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Transport",
        &[
            "taksi", "taxi", "avtobus", "metro", "benzin", "yoqilg'i", "propan", "metan",
            "yandex go", "mashina",
        ],
    ),
    (
        "Kafe",
        &[
            "kafe", "restoran", "kofe", "choyxona", "fastfood", "lavash", "burger", "pitsa",
            "tushlik",
        ],
    ),
    (
        "Oziq-ovqat",
        &[
            "non", "ovqat", "bozor", "oziq", "go'sht", "sabzavot", "meva", "sut", "supermarket",
            "makro", "korzinka",
        ],
    ),
    (
        "Kommunal",
        &["kommunal", "svet", "elektr", "gaz", "suv", "issiqlik"],
    ),
    (
        "Aloqa",
        &["telefon", "internet", "mobil", "paynet", "ucell", "beeline", "uzmobile"],
    ),
    (
        "Salomatlik",
        &["dori", "apteka", "shifokor", "klinika", "kasalxona", "stomatolog"],
    ),
    (
        "Ta'lim",
        &["kurs", "kitob", "o'qish", "kontrakt", "repetitor", "maktab"],
    ),
    ("Kiyim", &["kiyim", "poyabzal", "ko'ylak", "shim", "krossovka"]),
    ("Ko'ngilochar", &["kino", "konsert", "o'yin", "dam olish"]),
    ("Uy-joy", &["ijara", "kvartira", "remont", "mebel"]),
    ("Sovg'a", &["sovg'a", "tug'ilgan kun", "to'y"]),
];

pub const INCOME_CATEGORIES: &[(&str, &[&str])] = &[
    ("Maosh", &["maosh", "oylik", "ish haqi", "avans"]),
    ("Biznes", &["savdo", "sotdim", "foyda", "mijoz", "buyurtma"]),
    ("Freelance", &["freelance", "frilans", "loyiha"]),
    ("Sovg'a", &["sovg'a", "hadya"]),
    ("Investitsiya", &["dividend", "foiz", "depozit"]),
];

/// Month names with their number. Both common spellings of Sep/Oct.
pub const MONTHS: &[(&str, u32)] = &[
    ("yanvar", 1),
    ("fevral", 2),
    ("mart", 3),
    ("aprel", 4),
    ("may", 5),
    ("iyun", 6),
    ("iyul", 7),
    ("avgust", 8),
    ("sentabr", 9),
    ("sentyabr", 9),
    ("oktabr", 10),
    ("oktyabr", 10),
    ("noyabr", 11),
    ("dekabr", 12),
];

// Case endings a month name may carry ("15 martgacha", "5 mayda")
const MONTH_SUFFIXES: &[&str] = &["", "da", "ga", "gacha", "dan", "ning", "ni", "oyi", "oyida"];

// "shanba" last: every other day name ends with it
pub const WEEKDAYS: &[(&str, Weekday)] = &[
    ("dushanba", Weekday::Mon),
    ("seshanba", Weekday::Tue),
    ("chorshanba", Weekday::Wed),
    ("payshanba", Weekday::Thu),
    ("juma", Weekday::Fri),
    ("yakshanba", Weekday::Sun),
    ("shanba", Weekday::Sat),
];

/// Fold case and apostrophe variants so keyword tables only need one spelling
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ʻ' | 'ʼ' | '’' | '‘' | '`' | '´' => '\'',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Split normalized text into word tokens (letters, digits, apostrophes)
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Check a single keyword against the text
pub fn has_keyword(normalized: &str, tokens: &[&str], keyword: &str) -> bool {
    if keyword.contains(' ') {
        normalized.contains(keyword)
    } else {
        tokens.iter().any(|t| t.starts_with(keyword))
    }
}

/// Number of keywords from the list that occur in the text
pub fn count_hits(normalized: &str, tokens: &[&str], keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|k| has_keyword(normalized, tokens, k))
        .count()
}

/// Resolve a word like "martgacha" to its month number
pub fn month_from_word(word: &str) -> Option<u32> {
    MONTHS.iter().find_map(|(name, number)| {
        word.strip_prefix(name)
            .filter(|rest| MONTH_SUFFIXES.contains(rest))
            .map(|_| *number)
    })
}

pub fn weekday_from_word(word: &str) -> Option<Weekday> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| word.starts_with(name))
        .map(|(_, day)| *day)
}
