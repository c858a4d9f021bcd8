//! Confirmation email rendering

use std::fmt::Write as _;

use crate::registration::Registration;

/// Shown in place of a missing member email.
const PLACEHOLDER: &str = "-";

/// A rendered confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationEmail {
    /// Recipient address (the lead email)
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

impl ConfirmationEmail {
    /// Render the confirmation for an admitted registration.
    pub fn render(registration: &Registration) -> Self {
        Self {
            to: registration.lead_email.clone(),
            subject: format!(
                "Hackathon Registration Confirmed - {}",
                registration.identifier
            ),
            html_body: render_html(registration),
            text_body: render_text(registration),
        }
    }
}

fn render_text(r: &Registration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "HACKATHON REGISTRATION CONFIRMED");
    let _ = writeln!(out, "{}", "=".repeat(40));
    let _ = writeln!(out, "Hackathon ID : {}", r.identifier);
    let _ = writeln!(out, "Team Name    : {}", r.team_name);
    let _ = writeln!(out, "Problem Track: {}", r.problem_track);
    let _ = writeln!(out, "Team Size    : {}", r.team_size);
    let _ = writeln!(out, "Lead Name    : {}", r.lead_name);
    let _ = writeln!(out, "Lead Email   : {}", r.lead_email);
    let _ = writeln!(out, "Lead Phone   : {}", r.lead_phone);
    let _ = writeln!(out, "Registered At: {}", r.registered_at());

    if !r.additional_members.is_empty() {
        let _ = writeln!(out, "\nAdditional Members:");
        for (i, m) in r.additional_members.iter().enumerate() {
            let email = m.member_email.as_deref().unwrap_or(PLACEHOLDER);
            let _ = writeln!(out, "  {}. {} ({})", i + 1, m.member_name, email);
        }
    }

    out
}

const CELL: &str = "padding:9px 14px;border:1px solid #e2e8f0;";

fn detail_row(out: &mut String, label: &str, value: &str, shaded: bool) {
    let style = if shaded { " style=\"background:#f7fafc;\"" } else { "" };
    let _ = write!(
        out,
        "<tr{style}><td style=\"{CELL}font-weight:bold;width:38%;\">{label}</td>\
         <td style=\"{CELL}\">{value}</td></tr>",
        value = escape_html(value),
    );
}

fn render_html(r: &Registration) -> String {
    let mut details = String::new();
    let team_size = format!("{} member(s)", r.team_size);
    let registered_at = r.registered_at();
    let rows: [(&str, &str); 7] = [
        ("Team Name", r.team_name.as_str()),
        ("Problem Track", r.problem_track.as_str()),
        ("Team Size", team_size.as_str()),
        ("Team Lead", r.lead_name.as_str()),
        ("Lead Email", r.lead_email.as_str()),
        ("Lead Phone", r.lead_phone.as_str()),
        ("Registered At", registered_at.as_str()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        detail_row(&mut details, label, value, i % 2 == 0);
    }

    let mut members = String::new();
    if !r.additional_members.is_empty() {
        members.push_str(
            "<h3 style=\"color:#4a5568;margin-top:28px;\">Additional Team Members</h3>\
             <table style=\"border-collapse:collapse;width:100%;font-size:14px;\">\
             <thead><tr style=\"background:#f7fafc;\">\
             <th style=\"padding:8px 12px;border:1px solid #e2e8f0;text-align:left;\">#</th>\
             <th style=\"padding:8px 12px;border:1px solid #e2e8f0;text-align:left;\">Name</th>\
             <th style=\"padding:8px 12px;border:1px solid #e2e8f0;text-align:left;\">Email</th>\
             </tr></thead><tbody>",
        );
        for (i, m) in r.additional_members.iter().enumerate() {
            let _ = write!(
                members,
                "<tr><td style=\"{CELL}\">{}</td><td style=\"{CELL}\">{}</td>\
                 <td style=\"{CELL}\">{}</td></tr>",
                i + 1,
                escape_html(&m.member_name),
                escape_html(m.member_email.as_deref().unwrap_or(PLACEHOLDER)),
            );
        }
        members.push_str("</tbody></table>");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family:Arial,sans-serif;background:#f0f4f8;padding:30px;margin:0;">
  <div style="max-width:620px;margin:auto;background:#ffffff;border-radius:14px;overflow:hidden;">
    <div style="background:linear-gradient(135deg,#667eea 0%,#764ba2 100%);padding:36px 32px;text-align:center;">
      <h1 style="color:#fff;margin:0;font-size:28px;">Hackathon Registration</h1>
      <p style="color:#e9d8fd;margin:10px 0 0;font-size:16px;">You're officially registered!</p>
    </div>
    <div style="padding:36px 32px;">
      <p style="font-size:16px;color:#2d3748;margin-top:0;">Hi <strong>{lead}</strong>,</p>
      <p style="color:#4a5568;line-height:1.8;font-size:15px;">
        Your team has been successfully registered. Keep your <strong>Hackathon ID</strong>
        handy, you'll need it at check-in.
      </p>
      <div style="background:#f7fafc;border:2px dashed #667eea;border-radius:12px;padding:22px;text-align:center;margin:28px 0;">
        <p style="margin:0;font-size:11px;color:#718096;letter-spacing:2px;text-transform:uppercase;">Your Hackathon ID</p>
        <p style="margin:10px 0 0;font-size:34px;font-weight:bold;color:#667eea;letter-spacing:4px;">{id}</p>
      </div>
      <h3 style="color:#4a5568;margin-top:28px;">Registration Details</h3>
      <table style="border-collapse:collapse;width:100%;font-size:14px;">{details}</table>
      {members}
      <p style="color:#a0aec0;font-size:12px;margin-top:28px;">Didn't register? Please ignore this email.</p>
    </div>
  </div>
</body>
</html>"#,
        lead = escape_html(&r.lead_name),
        id = escape_html(&r.identifier),
    )
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::Member;
    use chrono::{TimeZone, Utc};

    fn sample() -> Registration {
        Registration {
            identifier: "HACK-AB12CD34".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            team_name: "<Byte> & Busters".to_string(),
            problem_track: "FinTech".to_string(),
            team_size: 3,
            lead_name: "Asha".to_string(),
            lead_email: "asha@example.com".to_string(),
            lead_phone: "9876543210".to_string(),
            additional_members: vec![
                Member::new("Ravi", None),
                Member::new("Meera", Some("meera@example.com".to_string())),
            ],
        }
    }

    #[test]
    fn test_subject_and_recipient() {
        let email = ConfirmationEmail::render(&sample());
        assert_eq!(email.to, "asha@example.com");
        assert_eq!(email.subject, "Hackathon Registration Confirmed - HACK-AB12CD34");
    }

    #[test]
    fn test_text_body_lists_everything() {
        let body = ConfirmationEmail::render(&sample()).text_body;
        assert!(body.contains("Hackathon ID : HACK-AB12CD34"));
        assert!(body.contains("Problem Track: FinTech"));
        assert!(body.contains("Team Size    : 3"));
        assert!(body.contains("Lead Phone   : 9876543210"));
        assert!(body.contains("Registered At: 2025-03-14 09:26:53 UTC"));
        assert!(body.contains("  1. Ravi (-)"));
        assert!(body.contains("  2. Meera (meera@example.com)"));
    }

    #[test]
    fn test_text_body_without_members() {
        let mut registration = sample();
        registration.additional_members.clear();
        let body = ConfirmationEmail::render(&registration).text_body;
        assert!(!body.contains("Additional Members"));
    }

    #[test]
    fn test_html_body_escapes_user_text() {
        let html = ConfirmationEmail::render(&sample()).html_body;
        assert!(html.contains("&lt;Byte&gt; &amp; Busters"));
        assert!(!html.contains("<Byte>"));
        assert!(html.contains("HACK-AB12CD34"));
        assert!(html.contains("Additional Team Members"));
        assert!(html.contains("3 member(s)"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a<b>"c"&'d'"#), "a&lt;b&gt;&quot;c&quot;&amp;&#39;d&#39;");
    }
}
