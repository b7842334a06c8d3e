//! The built-in hand-curated operator tables. These lists have no
//! structural rule behind them; they are maintained by hand.

pub(super) const BLOCKED_OPS: &[&str] = &[
    // non cpu ops
    "sparse_sampled_addmm",
    "hspmm",
    // sparse ops
    "sspaddmm",
    "coalesce",
    "_indices",
    "indices",
    "_values",
    "values",
    "crow_indices",
    "col_indices",
    // deprecated ops
    "floor_divide",
    "ger",
    // buggy ops
    "conj_physical",
    "binary_cross_entropy",
    "arccosh",
    // uncommon ops
    "cholesky",
    "lu_solve",
    "linalg_cholesky",
    "linalg_householder_product",
    "linalg_ldl_solve",
    "_compute_linear_combination",
    // training related ops
    "_make_dual",
    // cannot call directly
    "_fw_primal",
    // no documentation
    "_index_reduce",
];

/// Operators that already have bespoke dispatch code.
pub(super) const HAND_WRITTEN_OPS: &[&str] = &[
    "abs",
    "add",
    "addmm",
    "all",
    "any",
    "argmin",
    "bmm",
    "clamp",
    "clamp_min",
    "cumsum",
    "div",
    "fmod",
    "index_select",
    "leaky_relu",
    "linear",
    "log",
    "matmul",
    "mul",
    "narrow_copy",
    "nonzero",
    "pow",
    "remainder",
    "sigmoid",
    "sign",
    "sub",
    "tanh",
    "detach",
    "expand_as",
    "flatten",
    "narrow",
    "reshape_as",
    "select",
    "slice",
    "softmax",
    "split",
    "squeeze",
    "transpose",
    "view",
    "where",
];

/// Type-variant names (`name` or `name.overload`) whose out kernels size
/// their own output.
pub(super) const NO_RESIZE_OPS: &[&str] = &[
    "isin.Scalar_Tensor",
    "index_add",
    "dot",
    "vdot",
    "nuclear_norm",
    "histc",
    "l1_loss",
    "multi_margin_loss",
    "multilabel_margin_loss",
    "nll_loss",
    "nll_loss2d",
];

pub(super) const INT_TENSOR_OPS: &[&str] = &[
    "bitwise_not",
    "bitwise_and",
    "bitwise_or",
    "bitwise_xor",
    "bitwise_left_shift",
    "bitwise_right_shift",
    "gcd",
    "lcm",
    "scatter",
    "gather",
    "_convert_indices_from_coo_to_csr",
    "_convert_indices_from_csr_to_coo",
];

pub(super) const COMPLEX_TENSOR_OPS: &[&str] = &["view_as_real", "imag", "_conj"];

pub(super) const TENSOR_DIM_1_OPS: &[&str] = &[
    "addmv",
    "index_add",
    "_convert_indices_from_coo_to_csr",
    "_convert_indices_from_csr_to_coo",
    "nll_loss_backward",
    "dot",
    "vdot",
    "outer",
    "ger",
];

pub(super) const TENSOR_DIM_2_OPS: &[&str] = &[
    "addmm",
    "mm",
    "nuclear_norm",
    "diag",
    "_addmm_activation",
    "matrix_H",
    "t",
];

pub(super) const TENSOR_SHAPES: &[(&str, &str)] = &[("view_as_complex", "{2, 2}")];

/// `(operator, argument, round 0 literal, round 1 literal)`
pub(super) const TEST_VALUE_OVERRIDES: &[(&str, &str, &str, &str)] = &[
    ("addr", "self", "at::rand({6, 6})", "at::rand({22, 22})"),
    ("addr", "vec1", "at::rand({6})", "at::rand({22})"),
    ("addr", "vec2", "at::rand({6})", "at::rand({22})"),
    ("mv", "self", "at::rand({6, 6})", "at::rand({22, 22})"),
    ("mv", "vec", "at::rand({6})", "at::rand({22})"),
    ("addbmm", "self", "at::rand({6, 6})", "at::rand({22, 22})"),
    ("cross", "self", "at::rand({3, 3, 3})", "at::rand({22, 3, 22})"),
    ("cross", "other", "at::rand({3, 3, 3})", "at::rand({22, 3, 22})"),
    (
        "take",
        "index",
        "at::randint(0, 216, {20}, torch::kInt64)",
        "at::randint(0, 1000, {100}, torch::kInt64)",
    ),
    (
        "take_along_dim",
        "indices",
        "at::argsort(self0, 1, true)",
        "at::argsort(self1, 1, true)",
    ),
    (
        "masked_select",
        "mask",
        "at::randn({6, 6, 6}) > 0.5",
        "at::rand({22, 22, 22}) > 0.5",
    ),
    ("orgqr", "input2", "at::rand({6, 6})", "at::rand({22, 22})"),
    ("ormqr", "input2", "at::rand({6, 6})", "at::rand({22, 22})"),
    ("quantile", "q", "at::rand({6})", "at::rand({22})"),
    ("quantile", "interpolation", "\"linear\"", "\"linear\""),
    ("nanquantile", "q", "at::rand({6})", "at::rand({22})"),
    ("nanquantile", "interpolation", "\"linear\"", "\"linear\""),
    ("multi_margin_loss", "self", "at::rand({6, 6})", "at::rand({22, 22})"),
    (
        "multi_margin_loss",
        "target",
        "at::randint(6, {6}, torch::kInt64)",
        "at::randint(22, {22}, torch::kInt64)",
    ),
    ("multi_margin_loss", "weight", "at::rand({6})", "at::rand({22})"),
    ("multilabel_margin_loss", "self", "at::rand({6, 6})", "at::rand({22, 22})"),
    (
        "multilabel_margin_loss",
        "target",
        "at::randint(6, {6, 6}, torch::kInt64)",
        "at::randint(22, {22, 22}, torch::kInt64)",
    ),
    ("nll_loss", "self", "at::rand({6, 6})", "at::rand({22, 22})"),
    (
        "nll_loss",
        "target",
        "at::randint(6, {6}, torch::kInt64)",
        "at::randint(22, {22}, torch::kInt64)",
    ),
    ("nll_loss", "weight", "at::rand({6})", "at::rand({22})"),
    ("nll_loss2d", "self", "at::rand({6, 6, 6, 6})", "at::rand({22, 22, 22, 22})"),
    (
        "nll_loss2d",
        "target",
        "at::randint(6, {6, 6, 6}, torch::kInt64)",
        "at::randint(22, {22, 22, 22}, torch::kInt64)",
    ),
    ("nll_loss2d", "weight", "at::rand({6})", "at::rand({22})"),
    (
        "index_add",
        "index",
        "at::randint(0, 1, {2}, at::kInt)",
        "at::randint(0, 10, {16}, at::kInt)",
    ),
    ("scatter_reduce", "reduce", "\"mean\"", "\"mean\""),
];
