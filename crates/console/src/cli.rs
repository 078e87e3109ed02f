//! Command line definition.

use clap::{Args, Parser, Subcommand};
use domain::models::OrderDirection;

#[derive(Debug, Parser)]
#[command(name = "catalog-console")]
#[command(about = "Administrative console for the partner/product/event catalog")]
#[command(version)]
pub struct Cli {
    /// API base URL, overriding configuration.
    #[arg(long, global = true, env = "CATALOG_API_URL")]
    pub api_url: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Send notifications to the log instead of stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub quiet: bool,

    /// Debug logging unless RUST_LOG is set.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summary counts for every entity.
    Dashboard,
    Products {
        #[command(subcommand)]
        command: NamedCommand,
    },
    Events {
        #[command(subcommand)]
        command: NamedCommand,
    },
    Partners {
        #[command(subcommand)]
        command: PartnerCommand,
    },
    ProductEvents {
        #[command(subcommand)]
        command: ProductEventCommand,
    },
    Subscriptions {
        #[command(subcommand)]
        command: SubscriptionCommand,
    },
}

/// Search, sort and page flags shared by every list command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Case-insensitive search text.
    #[arg(long, short)]
    pub query: Option<String>,

    /// Column to sort by.
    #[arg(long, short)]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long, default_value_t = false)]
    pub desc: bool,

    #[arg(long, short, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    pub id: i64,

    /// Confirm the deletion. Without it only the confirmation prompt is shown.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

/// Fields of products and events.
#[derive(Debug, Clone, Default, Args)]
pub struct NamedFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

/// Commands for entities that only carry a name and description.
#[derive(Debug, Subcommand)]
pub enum NamedCommand {
    List(ListArgs),
    Create(NamedFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: NamedFields,
    },
    Delete(DeleteArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct PartnerFields {
    #[arg(long)]
    pub merchant_number: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub partner_id: Option<String>,

    #[arg(long)]
    pub client_id: Option<String>,

    /// Active or Inactive.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum PartnerCommand {
    List(ListArgs),
    Create(PartnerFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: PartnerFields,
    },
    Delete(DeleteArgs),
    /// Flip between Active and Inactive.
    ToggleStatus { id: i64 },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ProductEventFields {
    #[arg(long = "product-id")]
    pub product_id: Option<i64>,

    #[arg(long = "event-id")]
    pub event_id: Option<i64>,

    #[arg(long)]
    pub order: Option<i64>,
}

#[derive(Debug, Subcommand)]
pub enum ProductEventCommand {
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only mappings of this product.
        #[arg(long)]
        product: Option<i64>,

        /// Group mappings under their product in display order.
        #[arg(long, default_value_t = false)]
        grouped: bool,
    },
    Create(ProductEventFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProductEventFields,
    },
    Delete(DeleteArgs),
    /// Move a mapping one step up or down within its product.
    Move {
        id: i64,
        direction: OrderDirection,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct SubscriptionFields {
    #[arg(long = "partner-id")]
    pub partner_id: Option<i64>,

    #[arg(long = "product-event-id")]
    pub product_event_id: Option<i64>,

    /// ACTIVE or INACTIVE.
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum SubscriptionCommand {
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only subscriptions of this partner.
        #[arg(long)]
        partner: Option<i64>,
    },
    Create(SubscriptionFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: SubscriptionFields,
    },
    Delete(DeleteArgs),
    /// Flip between ACTIVE and INACTIVE.
    ToggleStatus { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("catalog-console").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dashboard() {
        let cli = parse(&["dashboard", "--json"]);
        assert!(cli.json);
        assert!(!cli.quiet);
        assert!(matches!(cli.command, Command::Dashboard));
    }

    #[test]
    fn test_parse_product_list_flags() {
        let cli = parse(&["products", "list", "--query", "plan", "--sort", "name", "--desc", "--page", "2"]);
        match cli.command {
            Command::Products {
                command: NamedCommand::List(args),
            } => {
                assert_eq!(args.query.as_deref(), Some("plan"));
                assert_eq!(args.sort.as_deref(), Some("name"));
                assert!(args.desc);
                assert_eq!(args.page, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_update_with_partial_fields() {
        let cli = parse(&["events", "update", "3", "--name", "Renewal"]);
        match cli.command {
            Command::Events {
                command: NamedCommand::Update { id, fields },
            } => {
                assert_eq!(id, 3);
                assert_eq!(fields.name.as_deref(), Some("Renewal"));
                assert!(fields.description.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_move_direction() {
        let cli = parse(&["product-events", "move", "5", "down"]);
        match cli.command {
            Command::ProductEvents {
                command: ProductEventCommand::Move { id, direction },
            } => {
                assert_eq!(id, 5);
                assert_eq!(direction, OrderDirection::Down);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_reject_unknown_direction() {
        let result = Cli::try_parse_from(["catalog-console", "product-events", "move", "5", "left"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_scoped_lists() {
        let cli = parse(&["subscriptions", "list", "--partner", "4"]);
        assert!(matches!(
            cli.command,
            Command::Subscriptions {
                command: SubscriptionCommand::List {
                    partner: Some(4),
                    ..
                }
            }
        ));

        let cli = parse(&["product-events", "list", "--product", "1", "--grouped"]);
        assert!(matches!(
            cli.command,
            Command::ProductEvents {
                command: ProductEventCommand::List {
                    product: Some(1),
                    grouped: true,
                    ..
                }
            }
        ));
    }

    #[test]
    fn test_delete_requires_explicit_yes() {
        let cli = parse(&["partners", "delete", "4"]);
        match cli.command {
            Command::Partners {
                command: PartnerCommand::Delete(args),
            } => assert!(!args.yes),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = parse(&["partners", "delete", "4", "--yes"]);
        assert!(matches!(
            cli.command,
            Command::Partners {
                command: PartnerCommand::Delete(DeleteArgs { yes: true, .. })
            }
        ));
    }

    #[test]
    fn test_parse_quiet_after_subcommand() {
        let cli = parse(&["products", "list", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_toggle_status() {
        let cli = parse(&["subscriptions", "toggle-status", "8"]);
        assert!(matches!(
            cli.command,
            Command::Subscriptions {
                command: SubscriptionCommand::ToggleStatus { id: 8 }
            }
        ));
    }
}
