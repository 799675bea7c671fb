//! Shared email content templates
//!
//! Canonical content generators for account emails, used by both
//! production (SES) and mock email services.

/// Plain-text body for the email-address verification email.
pub fn verification_text(name: &str, verification_url: &str) -> String {
    format!(
        "Hi {},\n\n\
        Thanks for signing up for Converse. Please confirm your email address\n\
        by opening the link below:\n\
        {}\n\n\
        If you didn't create an account, you can ignore this email.\n\n\
        Thanks,\n\
        The Converse Team",
        name, verification_url
    )
}

/// Styled HTML body for the email-address verification email.
pub fn verification_html(name: &str, verification_url: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #007cba;">Confirm your email address</h2>

                    <p>Hi {name},</p>

                    <p>Thanks for signing up for Converse. Please confirm your email address.</p>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{verification_url}"
                           style="background-color: #007cba; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block; font-weight: bold;">
                            Verify Email
                        </a>
                    </div>

                    <p>Or copy and paste this link in your browser:</p>
                    <p style="background-color: #f5f5f5; padding: 10px; border-radius: 4px; word-break: break-all;">
                        <a href="{verification_url}">{verification_url}</a>
                    </p>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">
                        If you didn't create an account, you can ignore this email.<br>
                        Thanks, The Converse Team
                    </p>
                </div>
            </body>
            </html>
            "#,
        name = name,
        verification_url = verification_url
    )
}

/// Plain-text body for the password reset email.
pub fn password_reset_text(reset_url: &str, expires_in_minutes: i64) -> String {
    format!(
        "Hi there,\n\n\
        We received a request to reset your Converse password.\n\
        Open the link below to choose a new one:\n\
        {}\n\n\
        This link will expire in {} minutes and can only be used once.\n\n\
        If you didn't request a reset, you can ignore this email.\n\n\
        Thanks,\n\
        The Converse Team",
        reset_url, expires_in_minutes
    )
}

/// Styled HTML body for the password reset email.
pub fn password_reset_html(reset_url: &str, expires_in_minutes: i64) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #007cba;">Reset your password</h2>

                    <p>We received a request to reset your Converse password.</p>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{reset_url}"
                           style="background-color: #007cba; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block; font-weight: bold;">
                            Choose a new password
                        </a>
                    </div>

                    <p>Or copy and paste this link in your browser:</p>
                    <p style="background-color: #f5f5f5; padding: 10px; border-radius: 4px; word-break: break-all;">
                        <a href="{reset_url}">{reset_url}</a>
                    </p>

                    <p style="color: #666; font-size: 14px;">
                        <em>This link will expire in {expires_in_minutes} minutes and can only be used once.</em>
                    </p>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">
                        If you didn't request a reset, you can ignore this email.<br>
                        Thanks, The Converse Team
                    </p>
                </div>
            </body>
            </html>
            "#,
        reset_url = reset_url,
        expires_in_minutes = expires_in_minutes
    )
}
