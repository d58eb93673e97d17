use super::*;

use chrono::NaiveDate;
use sentrend_core::Stakeholder;
use sentrend_db::PartitionedTable;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["sentrend-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["sentrend-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["sentrend-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn trend_show_parses_stakeholder_and_dates() {
    let cli = Cli::try_parse_from([
        "sentrend-cli",
        "trend",
        "show",
        "--company",
        "7",
        "--stakeholder",
        "investor",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-31",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Trend {
            command:
                TrendCommands::Show {
                    company,
                    stakeholder,
                    start,
                    end,
                    from_buckets,
                },
        }) => {
            assert_eq!(company, 7);
            assert_eq!(stakeholder, Some(Stakeholder::Investor));
            assert_eq!(start, date(2024, 1, 1));
            assert_eq!(end, date(2024, 1, 31));
            assert!(!from_buckets);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn trend_show_from_buckets_flag() {
    let cli = Cli::try_parse_from([
        "sentrend-cli",
        "trend",
        "show",
        "--company",
        "1",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-02",
        "--from-buckets",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trend {
            command: TrendCommands::Show {
                stakeholder: None,
                from_buckets: true,
                ..
            }
        })
    ));
}

#[test]
fn trend_show_rejects_unknown_stakeholder() {
    let result = Cli::try_parse_from([
        "sentrend-cli",
        "trend",
        "show",
        "--company",
        "1",
        "--stakeholder",
        "shareholder",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-02",
    ]);
    assert!(result.is_err());
}

#[test]
fn trend_show_requires_dates() {
    let result = Cli::try_parse_from(["sentrend-cli", "trend", "show", "--company", "1"]);
    assert!(result.is_err());
}

#[test]
fn trend_rebuild_company_is_optional() {
    let cli = Cli::try_parse_from(["sentrend-cli", "trend", "rebuild"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trend {
            command: TrendCommands::Rebuild { company: None }
        })
    ));

    let cli = Cli::try_parse_from(["sentrend-cli", "trend", "rebuild", "--company", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Trend {
            command: TrendCommands::Rebuild { company: Some(3) }
        })
    ));
}

#[test]
fn keywords_limit_defaults_to_none() {
    let cli = Cli::try_parse_from([
        "sentrend-cli",
        "keywords",
        "--company",
        "2",
        "--start",
        "2024-01-01",
        "--end",
        "2024-03-31",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Keywords {
            company: 2,
            limit: None,
            ..
        })
    ));
}

#[test]
fn summary_companies_accepts_as_of() {
    let cli = Cli::try_parse_from([
        "sentrend-cli",
        "summary",
        "companies",
        "--as-of",
        "2024-06-30",
    ])
    .unwrap();
    match cli.command {
        Some(Commands::Summary {
            command: SummaryCommands::Companies { as_of },
        }) => assert_eq!(as_of, Some(date(2024, 6, 30))),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn summary_stakeholders_defaults_as_of() {
    let cli = Cli::try_parse_from(["sentrend-cli", "summary", "stakeholders"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Summary {
            command: SummaryCommands::Stakeholders { as_of: None }
        })
    ));
}

#[test]
fn distribution_defaults_to_thirty_days() {
    let cli = Cli::try_parse_from(["sentrend-cli", "distribution"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Distribution {
            company: None,
            days: 30
        })
    ));
}

#[test]
fn partition_ensure_defaults() {
    let cli = Cli::try_parse_from(["sentrend-cli", "partition", "ensure"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Partition {
            command: PartitionCommands::Ensure {
                table: PartitionedTable::NewsArticleArchive,
                from: None,
                months: 3
            }
        })
    ));
}

#[test]
fn partition_list_rejects_unknown_table() {
    let result =
        Cli::try_parse_from(["sentrend-cli", "partition", "list", "--table", "companies"]);
    assert!(result.is_err());
}

#[test]
fn as_of_prefers_explicit_date() {
    assert_eq!(as_of_or_today(Some(date(2024, 1, 1))), date(2024, 1, 1));
}

#[test]
fn fmt_date_renders_missing_as_dash() {
    assert_eq!(fmt_date(None), "-");
    assert_eq!(fmt_date(Some(date(2024, 2, 29))), "2024-02-29");
}
