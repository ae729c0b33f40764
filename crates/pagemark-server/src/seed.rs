//! Document types and data elements available on a fresh server.

pub struct SeedType {
    pub name: &'static str,
    pub description: &'static str,
    pub elements: &'static [(&'static str, &'static str)],
}

const BORROWER: (&str, &str) = ("Borrower Name", "The name of the person or entity borrowing the money.");
const LENDER: (&str, &str) = ("Lender Name", "The name of the person or entity lending the money.");
const LOAN_AMOUNT: (&str, &str) = ("Loan Amount", "The total amount of money being borrowed.");

pub const SEED_TYPES: &[SeedType] = &[
    SeedType {
        name: "Credit Agreement",
        description: "A legal agreement outlining the terms and conditions for extending credit.",
        elements: &[
            BORROWER,
            LENDER,
            LOAN_AMOUNT,
            ("Interest Rate", "The percentage of the loan amount charged as interest."),
            ("Loan Term", "The duration over which the loan is to be repaid."),
            ("Repayment Schedule", "The schedule outlining the repayment of the loan."),
            ("Collateral Description", "A description of the assets pledged as security for the loan."),
            ("Loan Purpose", "The purpose for which the loan is being taken."),
            ("Financial Covenants", "The financial conditions that the borrower must adhere to."),
            ("Guarantor Information", "Information about the person or entity guaranteeing the loan."),
            ("Origination Fees", "The fees charged for processing the loan."),
            ("Prepayment Penalties", "The penalties for paying off the loan early."),
            ("Default Conditions", "The conditions under which the borrower is considered to be in default."),
            ("Amendment Clauses", "The clauses outlining how the loan agreement can be amended."),
            ("Governing Law", "The legal jurisdiction governing the loan agreement."),
            ("Disbursement Schedule", "The schedule outlining the disbursement of the loan funds."),
            ("Signatory Parties", "The parties who have signed the loan agreement."),
            ("Effective Date", "The date on which the loan agreement becomes effective."),
            ("Maturity Date", "The date on which the loan is to be fully repaid."),
            ("Payment Instructions", "The instructions for making loan payments."),
        ],
    },
    SeedType {
        name: "Draw Notice",
        description: "A notice sent by a lender to a borrower to request a drawdown of funds.",
        elements: &[
            BORROWER,
            LENDER,
            LOAN_AMOUNT,
            ("Drawdown Amount", "The amount being requested as a drawdown."),
            ("Drawdown Date", "The date on which the drawdown is requested."),
            ("Drawdown Purpose", "The purpose for which the drawdown is being requested."),
            ("Drawdown Instructions", "The instructions for processing the drawdown."),
            ("Drawdown Authorization", "The authorization for the drawdown request."),
        ],
    },
];
