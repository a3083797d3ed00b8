use rust_decimal::Decimal;

/// The derived monetary figures for a transaction.
///
/// Figures are always computed together so that the relationships between
/// them hold by construction: the discount is taken from the gross amount,
/// the advance is clamped to the net amount, and the remaining balance is the
/// net amount less the clamped advance. The clamping happens here, before
/// anything is persisted, rather than in a display layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionFigures {
    gross_amount: Decimal,
    discount_amount: Decimal,
    net_amount: Decimal,
    advance_amount: Decimal,
    remaining_amount: Decimal,
}

impl TransactionFigures {
    /// Compute the derived figures from the raw entry values.
    ///
    /// # Arguments
    /// * `quantity` - The number of units traded.
    /// * `unit_price` - The price of a single unit.
    /// * `discount_rate` - The discount applied to the gross amount, as a
    ///   percentage between 0 and 100.
    /// * `advance_payment` - The amount paid when the transaction was
    ///   recorded. If this exceeds the net amount it is clamped down to it.
    ///
    /// The inputs are assumed to have passed range validation already. See
    /// [`NewTransactionData`][super::transactions::NewTransactionData].
    pub fn compute(
        quantity: Decimal,
        unit_price: Decimal,
        discount_rate: Decimal,
        advance_payment: Decimal,
    ) -> Self {
        let gross_amount = quantity * unit_price;
        let discount_amount = gross_amount * (discount_rate / Decimal::ONE_HUNDRED);
        let net_amount = gross_amount - discount_amount;

        let advance_amount = advance_payment.min(net_amount);
        let remaining_amount = net_amount - advance_amount;

        Self {
            gross_amount,
            discount_amount,
            net_amount,
            advance_amount,
            remaining_amount,
        }
    }

    pub fn gross_amount(&self) -> Decimal {
        self.gross_amount
    }

    pub fn discount_amount(&self) -> Decimal {
        self.discount_amount
    }

    pub fn net_amount(&self) -> Decimal {
        self.net_amount
    }

    /// The advance payment, clamped so it never exceeds the net amount.
    pub fn advance_amount(&self) -> Decimal {
        self.advance_amount
    }

    pub fn remaining_amount(&self) -> Decimal {
        self.remaining_amount
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn compute_with_discount_and_advance() {
        let figures = TransactionFigures::compute(dec!(10), dec!(1000), dec!(10), dec!(3000));

        assert_eq!(dec!(10000), figures.gross_amount());
        assert_eq!(dec!(1000), figures.discount_amount());
        assert_eq!(dec!(9000), figures.net_amount());
        assert_eq!(dec!(3000), figures.advance_amount());
        assert_eq!(dec!(6000), figures.remaining_amount());
    }

    #[test]
    fn compute_without_discount() {
        let figures = TransactionFigures::compute(dec!(3), dec!(250), dec!(0), dec!(0));

        assert_eq!(dec!(750), figures.gross_amount());
        assert_eq!(dec!(0), figures.discount_amount());
        assert_eq!(dec!(750), figures.net_amount());
        assert_eq!(dec!(750), figures.remaining_amount());
    }

    #[test]
    fn compute_clamps_advance_to_net_amount() {
        let figures = TransactionFigures::compute(dec!(10), dec!(1000), dec!(10), dec!(9500));

        assert_eq!(dec!(9000), figures.net_amount());
        assert_eq!(dec!(9000), figures.advance_amount());
        assert_eq!(dec!(0), figures.remaining_amount());
    }

    #[test]
    fn compute_full_discount_clamps_advance_to_zero() {
        let figures = TransactionFigures::compute(dec!(4), dec!(500), dec!(100), dec!(100));

        assert_eq!(dec!(2000), figures.gross_amount());
        assert_eq!(dec!(2000), figures.discount_amount());
        assert_eq!(dec!(0), figures.net_amount());
        assert_eq!(dec!(0), figures.advance_amount());
        assert_eq!(dec!(0), figures.remaining_amount());
    }

    #[test]
    fn compute_fractional_quantity_is_exact() {
        // Gem weights are fractional, so the arithmetic has to stay exact.
        let figures = TransactionFigures::compute(dec!(2.5), dec!(1200), dec!(5), dec!(0));

        assert_eq!(dec!(3000), figures.gross_amount());
        assert_eq!(dec!(150), figures.discount_amount());
        assert_eq!(dec!(2850), figures.net_amount());
    }
}
