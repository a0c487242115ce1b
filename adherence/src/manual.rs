/*!

This is the long-form manual for `adherence` and the `eixos` dashboard.

## Input workbook

The dashboard reads one Excel workbook (`dados.xlsx` by default). Every sheet is an axis
(a strategic topic) and every row of a sheet is a goal of that axis.

The first row holds the headers. Headers are lowercased and their spaces replaced by
underscores before use, so `Aderência` and `aderência` are the same column.
The following columns are recognized:

| column        | also accepted                  | content                                   |
|---------------|--------------------------------|-------------------------------------------|
| `population`  | `populacao`, `população`       | support from the population, from 0 to 1  |
| `diagnosis`   | `diagnostico`, `diagnóstico`   | support from the technical diagnosis      |
| `adherence`   | `aderencia`, `aderência`       | `0` (low), `0.5` (medium) or `1` (high)   |
| `government`  | `governo`                      | name of the goal (optional)               |

Example:

| Governo            | Populacao | Diagnostico | Aderencia |
|--------------------|-----------|-------------|-----------|
| Ampliar creches    | 1         | 1           | 1         |
| Reformar praças    | 1         | 0           | 0.5       |

When there is no label column, goals are named `Goal_1`, `Goal_2`, ... following the rows of
the sheet.

## Radar chart

Requires `population` and `diagnosis`. The two columns are averaged (empty cells are ignored)
and shown as percentages next to the government axis, which is always at 100%.
The percentages are rounded to one decimal and the average of the two to an integer.
Ties are rounded to the even neighbour: `42.5` becomes `42` and `43.5` becomes `44`.

## Correspondence chart

Requires `population`, `diagnosis` and `adherence`. Goals are sorted by decreasing adherence
(goals with the same adherence keep the order of the sheet) and the goal with the highest
adherence is drawn at the top. A goal has a point in `População` (resp. `Diagnóstico`) when
its value in that column is exactly 1, and always has a point in `Governo`.

An adherence other than 0, 0.5 or 1 does not stop the chart: the goal is drawn in gray and
is left out of the lists of goals by level.

If a sheet lacks the columns of one chart, a warning is printed and the other chart and
the other axes are still processed.

## Command line

```bash
eixos --input dados.xlsx --axis Saúde --axis Educação --out-dir relatorios
```

* `--list` prints the axes of the workbook.
* `--axis all` selects all the axes. Without `--axis`, the axes are asked for on the terminal.
* `--password` gives the access password. Without it, it is asked for on the terminal.
* `--no-png` and `--no-pdf` disable the exports.
* `--out` writes a JSON summary of all the axes to a file (or `stdout`).
* `--reference` compares that summary with a previous one and fails on any difference.
* `--config` reads the settings from a JSON file:

```json
{
  "workbookPath": "dados.xlsx",
  "outputDirectory": "relatorios",
  "accessSecret": "seplan123",
  "axes": ["Saúde"],
  "exportPng": true,
  "exportPdf": true,
  "chartWidth": 900,
  "radarHeight": 600
}
```

Options given on the command line take precedence over the configuration file.

## Outputs

For each axis `X`: `radar_X.png`, `correspondencia_X.png` and `relatorio_X.pdf`. The PDF
holds the two percentages and both charts at a width of 150 mm.

*/
