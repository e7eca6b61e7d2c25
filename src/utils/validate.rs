use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static ADMISSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9/_-]+$").expect("Invalid admission number regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_admission_number(admission_number: &str) -> Result<(), &'static str> {
    if admission_number.is_empty() || admission_number.len() > 32 {
        return Err("Admission number length must be between 1 and 32 characters");
    }
    // 学号格式：字母、数字、斜杠、下划线或连字符
    if !ADMISSION_RE.is_match(admission_number) {
        return Err(
            "Admission number must contain only letters, numbers, slashes, underscores or hyphens",
        );
    }
    Ok(())
}

/// 姓名、班级名、科目名等自由文本字段
pub fn validate_display_name(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("{field} must be at most {max_len} characters"));
    }
    Ok(())
}

const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "abcd1234",
    "school123",
    "welcome1",
];

type PasswordRule = (fn(&str) -> bool, &'static str);

const PASSWORD_RULES: &[PasswordRule] = &[
    (
        |p: &str| p.chars().count() >= 8,
        "Password must be at least 8 characters long",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_uppercase()),
        "Password must contain at least one uppercase letter",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_lowercase()),
        "Password must contain at least one lowercase letter",
    ),
    (
        |p: &str| p.chars().any(|c| c.is_ascii_digit()),
        "Password must contain at least one digit",
    ),
    (
        |p: &str| !COMMON_PASSWORDS.iter().any(|w| p.eq_ignore_ascii_case(w)),
        "Password is too common",
    ),
];

/// 账号密码策略，所有未满足的规则以 "; " 连接返回
pub fn validate_password(password: &str) -> Result<(), String> {
    let failures: Vec<&str> = PASSWORD_RULES
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, msg)| *msg)
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("teacher_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("bad name!").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("bursar@school.ng").is_ok());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn test_admission_number() {
        assert!(validate_admission_number("ADM/2024/001").is_ok());
        assert!(validate_admission_number("").is_err());
        assert!(validate_admission_number("ADM 001").is_err());
    }

    #[test]
    fn test_display_name() {
        assert!(validate_display_name("Class name", "JSS 1A", 64).is_ok());
        assert_eq!(
            validate_display_name("Class name", "   ", 64).unwrap_err(),
            "Class name must not be empty"
        );
        assert!(validate_display_name("Subject", &"x".repeat(65), 64).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Sch00lHub!").is_ok());
        assert!(validate_password("MathsT3acher").is_ok());

        let err = validate_password("ab1").unwrap_err();
        assert!(err.contains("at least 8 characters"));
        assert!(err.contains("uppercase"));
        assert!(!err.contains("lowercase"));

        assert_eq!(
            validate_password("PASSWORDS").unwrap_err(),
            "Password must contain at least one lowercase letter; \
             Password must contain at least one digit"
        );
        assert_eq!(
            validate_password("Welcome1").unwrap_err(),
            "Password is too common"
        );
    }
}
