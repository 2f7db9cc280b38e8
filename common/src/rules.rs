//! 状态标注清理规则
//!
//! 考勤月报单元格中混杂着「缺卡(...)」「正常-」「迟到5分钟」等状态标注，
//! 这里按固定顺序逐条做正则替换，把它们删掉或折叠成分号。
//!
//! ## 规则顺序
//! 顺序即优先级：前面的窄规则先吃掉带括号的完整形式，
//! 后面的宽规则（如单独的「缺卡」）才处理剩余部分。移植或增删规则时必须保持顺序。

use crate::error::{Error, Result};
use regex::{NoExpand, Regex};

/// [`RuleSet::apply`] 的最大套用遍数
pub const MAX_PASSES: usize = 16;

/// 单条替换规则
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
}

impl Rule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// 全部匹配位置替换（子串匹配，不要求匹配整个单元格）
    fn replace_all(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned()
    }
}

/// 有序规则集
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// 所有规则共用同一替换文本
    pub fn from_patterns(patterns: &[&str], replacement: &str) -> Result<Self> {
        let rules = patterns
            .iter()
            .map(|p| Rule::new(p, replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// 删除规则集（替换为空）
    pub fn delete(patterns: &[&str]) -> Result<Self> {
        Self::from_patterns(patterns, "")
    }

    /// 折叠规则集（替换为分号）
    pub fn collapse(patterns: &[&str]) -> Result<Self> {
        Self::from_patterns(patterns, ";")
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// 按顺序套用一遍
    pub fn apply_once(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.replace_all(&acc))
    }

    /// 反复套用直到文本不再变化，并去除首尾空白
    ///
    /// 删除后相邻片段可能拼出新的可匹配文本（如「正常 -」去掉空格后成为「正常-」），
    /// 所以一遍不一定收敛。
    /// 替换结果比原文长的规则集不一定收敛，最多套用 [`MAX_PASSES`] 遍。
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.trim().to_string();
        for _ in 0..MAX_PASSES {
            let next = self.apply_once(&current).trim().to_string();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// 单元格文本清理（带防清空保护）
///
/// 清理结果为空时返回原值：无法完全归约为噪声的单元格不能被抹掉。
/// 原值本身为空（或全是空白）时返回空字符串。
pub fn normalize(text: &str, rules: &RuleSet) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let cleaned = rules.apply(text);
    if cleaned.is_empty() {
        text.to_string()
    } else {
        cleaned
    }
}

/// 第二阶段的单元格清理：先删除，再把时长标注折叠为分号，最后去空白
///
/// 与 [`normalize`] 不同，结果可以为空。
pub fn strip_and_collapse(text: &str, delete: &RuleSet, collapse: &RuleSet) -> String {
    let stripped = delete.apply(text);
    collapse.apply_once(&stripped).trim().to_string()
}

/// 月报删除规则（基础）
pub const DELETE_PATTERNS: &[&str] = &[
    // 带分号的缺卡
    r"缺卡\([^)]*\);",
    r"缺卡\(.*?\);",
    // 不带分号的缺卡
    r"缺卡\([^)]*\)",
    r"缺卡\(.*?\)",
    // 补卡申请（全角括号）
    r"补卡申请（[^）]*）",
    r"补卡申请（.*?）",
    r"正常\(补卡\)-",
    r"正常-",
    // 各种横线
    r"--",
    r"— —",
    r"——",
    // 单独的缺卡
    r"缺卡",
    r"\r\n|\r|\n|\t",
    r" +",
];

/// 未排班月报：放在基础规则之前
pub const UNSCHEDULED_LEADING_PATTERNS: &[&str] = &[r"正常（未排班）"];

/// 未排班月报：放在基础规则之后
pub const UNSCHEDULED_TRAILING_PATTERNS: &[&str] = &[r"地点异常.*?;", r"(补卡)-"];

/// 第二阶段删除规则：放在未排班规则和基础规则之后
pub const REWRITE_TRAILING_PATTERNS: &[&str] = &[
    r"地点异常.*?;",
    r"\(补卡\)-",
    r"正常\(管理员校准、补卡\)-",
    r"正常\(休息\)",
    r"正常（休息）",
    r"正常\(管理员校准\)-",
    // 带分号的时长标注整体删除
    r"迟到\s*[\d.]*\s*分钟-?;",
    r"早退\s*[\d.]*\s*分钟-?;",
    r"旷工\s*[\d.]*\s*分钟-?;",
];

/// 第二阶段折叠规则：剩余的时长标注替换为分号
pub const COLLAPSE_PATTERNS: &[&str] = &[
    r"迟到\s*[\d.]*\s*分钟-?",
    r"早退\s*[\d.]*\s*分钟-?",
    r"旷工\s*[\d.]*\s*分钟-?",
];

lazy_static::lazy_static! {
    /// 基础删除规则集
    pub static ref STANDARD_DELETE: RuleSet = RuleSet::delete(DELETE_PATTERNS).unwrap();

    /// 未排班月报删除规则集
    pub static ref UNSCHEDULED_DELETE: RuleSet = {
        let patterns: Vec<&str> = UNSCHEDULED_LEADING_PATTERNS
            .iter()
            .chain(DELETE_PATTERNS)
            .chain(UNSCHEDULED_TRAILING_PATTERNS)
            .copied()
            .collect();
        RuleSet::delete(&patterns).unwrap()
    };

    /// 第二阶段删除规则集
    pub static ref REWRITE_DELETE: RuleSet = {
        let patterns: Vec<&str> = UNSCHEDULED_LEADING_PATTERNS
            .iter()
            .chain(DELETE_PATTERNS)
            .chain(REWRITE_TRAILING_PATTERNS)
            .copied()
            .collect();
        RuleSet::delete(&patterns).unwrap()
    };

    /// 第二阶段折叠规则集
    pub static ref COLLAPSE: RuleSet = RuleSet::collapse(COLLAPSE_PATTERNS).unwrap();
}
