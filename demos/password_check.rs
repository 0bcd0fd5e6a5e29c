use sketchbook::bloom::MembershipFilter;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn main() -> Result<(), sketchbook::Error> {
    env_logger::init();

    let mut filter = MembershipFilter::new(1000, 3)?;
    for password in &["password123", "admin123", "qwerty123"] {
        filter.add(*password);
    }

    let candidates = vec![
        Some("password123"),
        Some("newpassword"),
        Some("admin123"),
        Some("guest"),
        Some(""),
        None,
    ];
    let rows = filter
        .classify(candidates)
        .into_iter()
        .map(|result| Row {
            password: match result.item {
                Some(password) => format!("'{}'", password),
                None => "(none)".to_owned(),
            },
            status: result.status.to_string(),
        })
        .collect::<Vec<_>>();

    println!("{}", Table::new(rows).with(Style::modern()));
    Ok(())
}
