use crate::databases::money::{MoneyDonation, PaymentStatus};

/// Sum of amounts over completed payments only.
pub fn total_completed<'a, I>(donations: I) -> f64
where
    I: IntoIterator<Item = &'a MoneyDonation>,
{
    donations
        .into_iter()
        .filter(|d| d.payment_status == PaymentStatus::Completed)
        .map(|d| d.amount)
        .sum()
}
