use indexql::{schema::app, Result};

/// Accounts, allowances and the transfer/approval events an ERC20 indexer
/// records.
pub fn erc20() -> Result<app::Schema> {
    app::Schema::builder()
        .table(
            "Account",
            [
                ("id", app::Column::hex()),
                ("balance", app::Column::bigint()),
                ("isOwner", app::Column::boolean()),
                ("allowances", app::Column::many("Allowance", "owner")),
                ("approvalOwnerEvents", app::Column::many("ApprovalEvent", "owner")),
                ("transferFromEvents", app::Column::many("TransferEvent", "from")),
                ("transferToEvents", app::Column::many("TransferEvent", "to")),
            ],
        )
        .table(
            "Allowance",
            [
                ("id", app::Column::string()),
                ("amount", app::Column::bigint()),
                ("owner", app::Column::hex().references("Account.id")),
                ("spender", app::Column::hex().references("Account.id")),
                ("ownerAccount", app::Column::one("owner")),
                ("spenderAccount", app::Column::one("spender")),
            ],
        )
        .table(
            "TransferEvent",
            [
                ("id", app::Column::string()),
                ("amount", app::Column::bigint()),
                ("timestamp", app::Column::int()),
                ("from", app::Column::hex().references("Account.id")),
                ("to", app::Column::hex().references("Account.id")),
                ("fromAccount", app::Column::one("from")),
                ("toAccount", app::Column::one("to")),
            ],
        )
        .table(
            "ApprovalEvent",
            [
                ("id", app::Column::string()),
                ("amount", app::Column::bigint()),
                ("timestamp", app::Column::int()),
                ("owner", app::Column::hex().references("Account.id")),
                ("spender", app::Column::hex().references("Account.id")),
                ("ownerAccount", app::Column::one("owner")),
                ("spenderAccount", app::Column::one("spender")),
            ],
        )
        .build()
}
