//! The `bokigrade init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("exams")?;
    let exam_path = std::path::Path::new("exams/example.toml");
    if exam_path.exists() {
        println!("exams/example.toml already exists, skipping.");
    } else {
        std::fs::write(exam_path, EXAMPLE_EXAM)?;
        println!("Created exams/example.toml");
    }

    let answers_path = std::path::Path::new("answers.json");
    if answers_path.exists() {
        println!("answers.json already exists, skipping.");
    } else {
        std::fs::write(answers_path, EXAMPLE_ANSWERS)?;
        println!("Created answers.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit exams/example.toml with your questions");
    println!("  2. Run: bokigrade validate --exam exams/example.toml");
    println!("  3. Run: bokigrade grade --exam exams/example.toml --answers answers.json");

    Ok(())
}

const EXAMPLE_EXAM: &str = r#"# bokigrade exam definition

[exam]
id = "example"
title = "Example: Định khoản cơ bản"
time_limit_minutes = 60

[[questions]]
type = "journal"
points = 45.0
allowed_accounts = [
    "Tiền mặt (Cash)",
    "Tiền gửi ngân hàng (Bank)",
    "Doanh thu (Sales)",
    "Hàng tồn kho (Inventory)",
]

[[questions.expected_entries]]
debit_account = "Tiền mặt (Cash)"
debit_amount = 1000000.0
credit_account = "Doanh thu (Sales)"
credit_amount = 1000000.0

[[questions]]
type = "posting"
points = 20.0
expected_summary = "Ghi sổ doanh thu tháng 1"
expected_amounts = [1000000.0]

[[questions]]
type = "pnl_balance"
points = 35.0
expected_cogs = 600000.0
expected_gross_profit = 900000.0

[questions.materials]
begin_inventory = 0.0
purchases = 800000.0
ending_inventory = 200000.0
"#;

const EXAMPLE_ANSWERS: &str = r#"{
  "journal_rows": [
    {
      "debit_account": "Tiền mặt (Cash)",
      "debit_amount": "1000000",
      "credit_account": "Doanh thu (Sales)",
      "credit_amount": "1000000"
    }
  ],
  "posting": {
    "summary": "Ghi sổ doanh thu tháng 1",
    "amounts": ["1000000"]
  },
  "pnl": {
    "cogs": "600000",
    "gross_profit": "900000"
  }
}
"#;
