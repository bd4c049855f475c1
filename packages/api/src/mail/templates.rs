//! Plaintext mail bodies. Each function returns `(subject, body)`.

pub fn verification_email(full_name: &str, verify_url: &str) -> (String, String) {
    let subject = "Verify your InternTrack account".to_string();
    let body = format!(
        "Hello {full_name},\n\nPlease verify your account:\n{verify_url}\n\n- InternTrack"
    );
    (subject, body)
}

pub fn password_reset_email(full_name: &str, reset_url: &str) -> (String, String) {
    let subject = "Reset your InternTrack password".to_string();
    let body = format!(
        "Hello {full_name},\n\nReset your password using this link:\n{reset_url}\n\n- InternTrack"
    );
    (subject, body)
}

pub fn credentials_email(
    full_name: &str,
    email: &str,
    password: &str,
    login_url: &str,
) -> (String, String) {
    let subject = "Your InternTrack Login Credentials".to_string();
    let body = format!(
        "Hello {full_name},\n\n\
         Your account has been created by your company.\n\
         Email: {email}\n\
         Password: {password}\n\n\
         Login: {login_url}\n\n\
         - InternTrack"
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_body_contains_link() {
        let (subject, body) = verification_email("Ada", "https://app.example.com/verify?token=t1");
        assert!(subject.contains("Verify"));
        assert!(body.contains("Ada"));
        assert!(body.contains("https://app.example.com/verify?token=t1"));
    }

    #[test]
    fn credentials_body_contains_generated_password() {
        let (_, body) =
            credentials_email("Ada", "ada@example.com", "s3cret", "https://app.example.com/login.html");
        assert!(body.contains("ada@example.com"));
        assert!(body.contains("s3cret"));
        assert!(body.contains("login.html"));
    }
}
